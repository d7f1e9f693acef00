// Metadata documents: the per-token JSON files written to the output
// directory, one per CSV record, pointing at the uploaded image.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::Record;
use crate::template;

/// A single token metadata document. Serialized field order is the order
/// declared here.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Build the metadata document for one record. A description given in the
/// data file is taken verbatim; only records without one fall back to the
/// rendered template. The image URL joins the upload root with the
/// resolved image filename.
pub fn build_metadata(record: &Record, template: &str, root: &str) -> Metadata {
    let description = match &record.description {
        Some(text) => text.clone(),
        None => template::render_description(template, record),
    };
    Metadata {
        name: record.name.clone(),
        description,
        image: format!("{}/{}", root, record.filename),
    }
}

/// Clear and recreate the output directory. Stale documents from an
/// earlier run would otherwise survive next to the fresh set.
pub fn reset_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        warn!("Output directory already exists, clearing: {}", path.display());
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove output directory {}", path.display()))?;
    }
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory {}", path.display()))?;
    Ok(())
}

/// Write one document as `<token id>.json` under the output directory.
pub fn write_metadata(output_dir: &Path, record: &Record, metadata: &Metadata) -> Result<()> {
    let path = output_dir.join(format!("{}.json", record.token_id));
    let json = serde_json::to_string(metadata).context("Serializing metadata document")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write metadata file {}", path.display()))?;
    Ok(())
}
