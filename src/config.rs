// Run configuration. The environment is read exactly once, here; the
// resulting `Config` value is passed down to the loader, uploader and
// generator and never mutated after startup.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Default storage service endpoint; override with `NFT_STORAGE_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.nft.storage";

/// Fallback token file in the user's home directory.
const TOKEN_FILE: &str = ".nftmeta_token";

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the CSV file, `images/` and the optional template.
    pub input_dir: PathBuf,

    /// Directory the metadata files are written to (recreated every run).
    pub output_dir: PathBuf,

    /// Name of the CSV file inside the input directory.
    pub data_file: String,

    /// Base URL of the storage service API.
    pub api_base_url: String,

    /// Bearer token for the storage service, if one was configured.
    pub token: Option<String>,

    /// Skip the upload and use the placeholder locator instead.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            data_file: "data.csv".to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            token: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Build a config from the environment: `NFT_STORAGE_TOKEN` (with the
    /// home-directory token file as fallback), `NFT_STORAGE_API_URL` and
    /// `DRY_RUN`. Directory paths keep their defaults here; the command
    /// line overrides them on top.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            input_dir: default.input_dir,
            output_dir: default.output_dir,
            data_file: default.data_file,
            api_base_url: env::var("NFT_STORAGE_API_URL").unwrap_or(default.api_base_url),
            token: env::var("NFT_STORAGE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .or_else(load_token_file),
            dry_run: env::var("DRY_RUN")
                .map(|v| flag_enabled(&v))
                .unwrap_or(default.dry_run),
        }
    }

    /// Directory the image files live in.
    pub fn image_dir(&self) -> PathBuf {
        self.input_dir.join("images")
    }

    /// Full path of the CSV data file.
    pub fn data_path(&self) -> PathBuf {
        self.input_dir.join(&self.data_file)
    }

    /// Full path of the optional description template.
    pub fn template_path(&self) -> PathBuf {
        self.input_dir.join("template.md")
    }

    /// The bearer token, or an error naming the variable when it is
    /// missing.
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow!("NFT_STORAGE_TOKEN is not set; export it or pass --dry-run"))
    }
}

/// Interpret a boolean environment value: set and not "false"/"0" is on.
fn flag_enabled(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    !v.is_empty() && v != "false" && v != "0"
}

/// Load a token from the user's home directory file, if one was saved
/// there.
fn load_token_file() -> Option<String> {
    let dir = dirs::home_dir()?;
    let data = fs::read_to_string(dir.join(TOKEN_FILE)).ok()?;
    let token = data.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
