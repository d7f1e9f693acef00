// Typed pipeline errors. Most I/O glue in this crate reports plain
// `anyhow` errors with context; the two failure kinds callers need to
// tell apart get their own variants here and still flow through
// `anyhow::Result` unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// No `base + extension` candidate exists as a file under the image
    /// directory. Raised while loading, before anything is uploaded or
    /// written.
    #[error("Image file not found: {0}")]
    MissingImage(String),

    /// Collected validator messages. A non-empty list halts the run
    /// before the upload.
    #[error("validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}
