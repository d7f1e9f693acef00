// Description templates: `{{field}}` placeholders substituted from a
// record's fields. Matching is case-insensitive and tolerates whitespace
// inside the braces; a placeholder naming no field becomes an empty
// string instead of surviving into the output.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::Record;

static PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap());

/// Read the template file, or fall back to the empty template when the
/// file does not exist.
pub fn load_template(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("failed to read template {}", path.display()))
}

/// Substitute every `{{ field }}` placeholder in the template with the
/// record's value for that field. Single pass: substituted values are
/// inserted literally and never re-scanned for placeholders.
pub fn render_description(template: &str, record: &Record) -> String {
    // Lowercased lookup; the first column wins when two headers collide
    // case-insensitively.
    let mut values: HashMap<String, &str> = HashMap::new();
    for (key, value) in &record.fields {
        values.entry(key.to_lowercase()).or_insert(value);
    }

    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let key = caps[1].trim().to_lowercase();
            values.get(&key).copied().unwrap_or("").to_string()
        })
        .into_owned()
}
