// Storage API client: a small blocking HTTP client for the
// NFT.storage-compatible upload endpoint. Exactly one request matters
// here: POST /upload with a multipart form of image files, answered by
// the CID of the stored directory.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Root locator substituted for the real upload in dry-run mode.
pub const DRY_RUN_ROOT: &str = "ipfs://test";

/// Blocking client for the storage service, holding the base URL and the
/// bearer token for authenticated calls.
pub struct StorageClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Response envelope of the upload endpoint.
#[derive(Serialize, Deserialize, Debug)]
struct UploadResponse {
    ok: bool,
    value: UploadValue,
}

/// Payload of a successful upload: the CID of the stored directory.
#[derive(Serialize, Deserialize, Debug)]
struct UploadValue {
    cid: String,
}

/// Upload every resolved image as one batch and return the root locator
/// shared by all metadata documents. In dry-run mode no client is built
/// and no network call can happen; the fixed placeholder comes back
/// instead.
pub fn upload_images(config: &Config, files: &[PathBuf]) -> Result<String> {
    if config.dry_run {
        return Ok(DRY_RUN_ROOT.to_string());
    }

    let token = config.require_token()?;
    let client = StorageClient::new(&config.api_base_url, token)?;
    client.upload_directory(files)
}

impl StorageClient {
    /// Create a client for the given endpoint. No request timeout is
    /// set: a directory of images can take arbitrarily long to push, and
    /// there is no resume support to fall back on.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(StorageClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Helper to build the Authorization header map for the bearer token.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&val).context("API token is not a valid header value")?,
        );
        Ok(headers)
    }

    /// Upload the given files as one directory batch. The part filename
    /// is the on-disk file name and the MIME type is detected from the
    /// extension. Returns the `ipfs://` root locator for the whole set.
    pub fn upload_directory(&self, files: &[PathBuf]) -> Result<String> {
        let url = format!("{}/upload", &self.base_url);

        let mut form = multipart::Form::new();
        for path in files {
            let file = File::open(path)
                .with_context(|| format!("Failed to open image file {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|s| s.to_str())
                .with_context(|| format!("Image path has no usable file name: {}", path.display()))?
                .to_string();
            let mime = mime_guess::from_path(path)
                .first_raw()
                .unwrap_or("application/octet-stream");
            let part = multipart::Part::reader(file)
                .file_name(file_name)
                .mime_str(mime)
                .context("Failed to set part MIME type")?;
            form = form.part("file", part);
        }

        let res = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Upload failed: {} - {}", status, txt);
        }

        let resp: UploadResponse = res.json().context("Parsing upload response json")?;
        if !resp.ok {
            anyhow::bail!("Upload rejected by storage service");
        }
        Ok(format!("ipfs://{}", resp.value.cid))
    }
}
