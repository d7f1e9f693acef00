// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses arguments, builds the configuration and hands off
// to `pipeline::run`.
//
// Module responsibilities:
// - `config`: Runtime configuration from defaults, environment
//   variables and the saved token file.
// - `data`: Loads the CSV data file and resolves each record's image
//   file on disk.
// - `validate`: Batch checks on the loaded records (names, duplicate
//   token ids and filenames).
// - `api`: Encapsulates HTTP interactions with the storage service
//   (multipart image upload).
// - `template`: Loads the description template and renders it with
//   record fields.
// - `metadata`: Builds the per-token metadata documents and writes them
//   to the output directory.
// - `pipeline`: Runs the stages end to end.
// - `error`: Typed errors shared by the stages.
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod template;
pub mod validate;
