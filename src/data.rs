// Data loading: CSV rows in, fully-resolved `Record`s out. Besides the
// parse itself this stage owns the two resolution rules of the tool:
// token ids default to the row index, and declared base filenames are
// matched against the image directory by trying a fixed extension list.

use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::config::Config;
use crate::error::AppError;

/// Suffixes tried, in order, when resolving a base filename to an actual
/// file under the image directory. The empty suffix comes first so that
/// an exact filename in the CSV beats any extension guessing.
pub const SEARCH_EXTENSIONS: &[&str] = &["", ".jpg", ".jpeg", ".png", ".gif", ".mov", ".mp4"];

/// One CSV row, fully resolved: token id assigned and image filename
/// verified to exist on disk.
#[derive(Debug, Clone)]
pub struct Record {
    /// Zero-based position of the row in the CSV.
    pub index: usize,

    /// Output file stem: the `tokenId` column, or the row index as a
    /// string when the column is absent or empty.
    pub token_id: String,

    /// Display name from the `name` column; empty when the column is
    /// missing.
    pub name: String,

    /// Verbatim description; `Some` only when present and non-empty.
    pub description: Option<String>,

    /// Image file name with extension, known to exist in the image dir.
    pub filename: String,

    /// Every column of the row in header order, with `tokenId` and
    /// `filename` carrying their resolved values. Template substitution
    /// works off this list.
    pub fields: Vec<(String, String)>,
}

impl Record {
    /// Exact-name field lookup (first matching column).
    pub fn field(&self, name: &str) -> Option<&str> {
        lookup(&self.fields, name)
    }

    fn from_row(
        index: usize,
        headers: &StringRecord,
        row: &StringRecord,
        image_dir: &Path,
    ) -> Result<Record> {
        // Cells missing from short rows read as empty strings.
        let mut fields: Vec<(String, String)> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), row.get(i).unwrap_or("").to_string()))
            .collect();

        let token_id = match lookup(&fields, "tokenId") {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => index.to_string(),
        };

        // The declared base name, or the token id when the column is
        // absent or empty.
        let base = match lookup(&fields, "filename") {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => token_id.clone(),
        };
        let filename = resolve_image_filename(image_dir, &base)?;

        let name = lookup(&fields, "name").unwrap_or("").to_string();
        let description = lookup(&fields, "description")
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        // Write the resolved values back so templates see them.
        set_field(&mut fields, "tokenId", &token_id);
        set_field(&mut fields, "filename", &filename);

        Ok(Record {
            index,
            token_id,
            name,
            description,
            filename,
            fields,
        })
    }
}

/// Load every row of the configured CSV file into resolved records,
/// preserving row order. Fails on the first row whose image cannot be
/// found, before anything is uploaded or written.
pub fn load_records(config: &Config) -> Result<Vec<Record>> {
    let path = config.data_path();
    let image_dir = config.image_dir();

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("failed to open CSV file {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV headers from {}", path.display()))?
        .clone();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("failed to parse CSV row {}", index + 1))?;
        records.push(Record::from_row(index, &headers, &row, &image_dir)?);
    }

    Ok(records)
}

/// Try each search extension against the base name and return the first
/// candidate that exists as a file in the image directory.
pub fn resolve_image_filename(image_dir: &Path, base: &str) -> Result<String, AppError> {
    if !base.is_empty() {
        for ext in SEARCH_EXTENSIONS {
            let candidate = format!("{base}{ext}");
            if image_dir.join(&candidate).is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(AppError::MissingImage(base.to_string()))
}

fn lookup<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn set_field(fields: &mut Vec<(String, String)>, key: &str, value: &str) {
    match fields.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => fields.push((key.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn input_tree(csv: &str, images: &[&str]) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        fs::create_dir_all(input.join("images")).unwrap();
        fs::write(input.join("data.csv"), csv).unwrap();
        for name in images {
            touch(&input.join("images"), name);
        }
        let config = Config {
            input_dir: input,
            ..Config::default()
        };
        (dir, config)
    }

    #[test]
    fn resolution_tries_extensions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cat.png");
        touch(dir.path(), "cat.mov");
        assert_eq!(
            resolve_image_filename(dir.path(), "cat").unwrap(),
            "cat.png"
        );
    }

    #[test]
    fn exact_filename_beats_extension_guessing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cat");
        touch(dir.path(), "cat.jpg");
        assert_eq!(resolve_image_filename(dir.path(), "cat").unwrap(), "cat");
    }

    #[test]
    fn declared_extension_resolves_directly() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "cat.png");
        assert_eq!(
            resolve_image_filename(dir.path(), "cat.png").unwrap(),
            "cat.png"
        );
    }

    #[test]
    fn directories_do_not_count_as_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cat.jpg")).unwrap();
        touch(dir.path(), "cat.gif");
        assert_eq!(
            resolve_image_filename(dir.path(), "cat").unwrap(),
            "cat.gif"
        );
    }

    #[test]
    fn missing_image_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_image_filename(dir.path(), "ghost").unwrap_err();
        assert_eq!(err.to_string(), "Image file not found: ghost");
        assert!(matches!(err, AppError::MissingImage(ref base) if base == "ghost"));
    }

    #[test]
    fn empty_base_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_image_filename(dir.path(), "").is_err());
    }

    #[test]
    fn token_id_defaults_to_row_index() {
        let (_dir, config) = input_tree("name,filename\nDog,dog\nCat,cat\n", &["dog.jpg", "cat.png"]);
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].token_id, "0");
        assert_eq!(records[1].token_id, "1");
    }

    #[test]
    fn explicit_token_id_is_kept() {
        let (_dir, config) = input_tree("tokenId,name,filename\n42,Dog,dog\n", &["dog.jpg"]);
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].token_id, "42");
    }

    #[test]
    fn empty_token_id_cell_falls_back_to_index() {
        let (_dir, config) = input_tree("tokenId,name,filename\n,Dog,dog\n", &["dog.jpg"]);
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].token_id, "0");
    }

    #[test]
    fn filename_falls_back_to_token_id() {
        let (_dir, config) = input_tree("tokenId,name\n7,Dog\n", &["7.gif"]);
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].filename, "7.gif");
    }

    #[test]
    fn resolved_values_are_visible_as_fields() {
        let (_dir, config) = input_tree("name,filename\nDog,dog\n", &["dog.jpg"]);
        let records = load_records(&config).unwrap();
        // Both were rewritten: the defaulted token id and the resolved
        // filename, the latter in its original column position.
        assert_eq!(records[0].field("tokenId"), Some("0"));
        assert_eq!(records[0].field("filename"), Some("dog.jpg"));
        assert_eq!(records[0].fields[1], ("filename".to_string(), "dog.jpg".to_string()));
    }

    #[test]
    fn empty_description_reads_as_none() {
        let (_dir, config) = input_tree(
            "name,description,filename\nDog,,dog\nCat,A cat,cat\n",
            &["dog.jpg", "cat.png"],
        );
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].description, None);
        assert_eq!(records[1].description.as_deref(), Some("A cat"));
    }

    #[test]
    fn extra_columns_survive_in_order() {
        let (_dir, config) = input_tree(
            "tokenId,name,color,mood,filename\n1,Dog,red,calm,dog\n",
            &["dog.jpg"],
        );
        let records = load_records(&config).unwrap();
        let keys: Vec<&str> = records[0].fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["tokenId", "name", "color", "mood", "filename"]);
        assert_eq!(records[0].field("mood"), Some("calm"));
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let (_dir, config) = input_tree("tokenId,name,filename,note\n5,Dog,dog\n", &["dog.jpg"]);
        let records = load_records(&config).unwrap();
        assert_eq!(records[0].field("note"), Some(""));
    }

    #[test]
    fn load_aborts_on_first_missing_image() {
        let (_dir, config) = input_tree("name,filename\nDog,dog\nCat,ghost\n", &["dog.jpg"]);
        let err = load_records(&config).unwrap_err();
        let app_err = err.downcast_ref::<AppError>().expect("typed error");
        assert!(matches!(app_err, AppError::MissingImage(base) if base == "ghost"));
    }

    #[test]
    fn missing_csv_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            input_dir: dir.path().join("nowhere"),
            ..Config::default()
        };
        let err = load_records(&config).unwrap_err();
        assert!(err.to_string().contains("data.csv"));
    }
}
