// Pipeline: the end-to-end run. Load and resolve the data file, validate
// the batch, upload the images, then reset the output directory and write
// one metadata document per record.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::{api, data, metadata, template, validate};

/// Run the whole pipeline for the given configuration.
pub fn run(config: &Config) -> Result<()> {
    let records = data::load_records(config)?;
    info!("Loaded {} records from {}", records.len(), config.data_path().display());

    let problems = validate::validate_records(&records);
    if !problems.is_empty() {
        for problem in &problems {
            error!("{}", problem);
        }
        return Err(AppError::Validation(problems).into());
    }

    let files: Vec<PathBuf> = records
        .iter()
        .map(|record| config.image_dir().join(&record.filename))
        .collect();

    let spinner = if config.dry_run {
        info!("Dry run: skipping upload of {} images", files.len());
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Uploading {} images...", files.len()));
        Some(pb)
    };
    let root = api::upload_images(config, &files)?;
    if let Some(pb) = spinner {
        pb.finish_with_message(format!("Uploaded to {}", root));
    }

    // Reset the output directory only after a successful upload.
    metadata::reset_output_dir(&config.output_dir)?;

    let template = template::load_template(&config.template_path())?;

    let bar = ProgressBar::new(records.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    bar.set_message("Writing metadata");
    for record in &records {
        let doc = metadata::build_metadata(record, &template, &root);
        metadata::write_metadata(&config.output_dir, record, &doc)?;
        bar.inc(1);
    }
    bar.finish_with_message("Metadata written");

    info!(
        "Wrote {} metadata files to {}",
        records.len(),
        config.output_dir.display()
    );
    Ok(())
}
