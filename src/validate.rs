// Validation stage, run between loading and upload. Checks report plain
// human-readable strings; the pipeline logs them and halts when any
// exist, so nothing is uploaded or written for a bad batch.

use std::collections::HashMap;

use crate::data::Record;

/// Check the loaded record set and collect every problem found. An empty
/// result means the batch is good to upload.
pub fn validate_records(records: &[Record]) -> Vec<String> {
    let mut errors = Vec::new();

    for record in records {
        if record.name.is_empty() {
            errors.push(format!(
                "record {} (row {}): missing required field `name`",
                record.token_id,
                record.index + 1
            ));
        }
        if !is_safe_token_id(&record.token_id) {
            errors.push(format!(
                "record {} (row {}): token id is not usable as a file name",
                record.token_id,
                record.index + 1
            ));
        }
    }

    // Duplicate token ids would overwrite each other's output files, and
    // duplicate filenames make the uploaded batch ambiguous.
    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    let mut seen_files: HashMap<&str, usize> = HashMap::new();
    for record in records {
        if let Some(first) = seen_ids.insert(record.token_id.as_str(), record.index) {
            errors.push(format!(
                "duplicate token id `{}` (rows {} and {})",
                record.token_id,
                first + 1,
                record.index + 1
            ));
        }
        if let Some(first) = seen_files.insert(record.filename.as_str(), record.index) {
            errors.push(format!(
                "duplicate image file `{}` (rows {} and {})",
                record.filename,
                first + 1,
                record.index + 1
            ));
        }
    }

    errors
}

/// Token ids become output file stems, so path-ish names are rejected.
fn is_safe_token_id(token_id: &str) -> bool {
    !token_id.is_empty()
        && !token_id.contains(['/', '\\'])
        && !token_id.contains("..")
        && !token_id.contains('\0')
}
