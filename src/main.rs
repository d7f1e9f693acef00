// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, build the configuration and
//   hand off to the pipeline.
// - Returns `anyhow::Result` so stage errors surface with context.

use std::path::PathBuf;

use clap::Parser;

use nftmeta_cli::config::Config;
use nftmeta_cli::pipeline;

/// Prepare an NFT collection: upload the images from a CSV data file and
/// write one metadata document per token.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the data file, the images folder and the template
    #[arg(long, default_value = "input")]
    input_dir: PathBuf,

    /// Directory the metadata documents are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Name of the CSV data file inside the input directory
    #[arg(long, default_value = "data.csv")]
    data_file: String,

    /// Skip the upload and point all documents at a placeholder root
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = Config::from_env();
    config.input_dir = args.input_dir;
    config.output_dir = args.output_dir;
    config.data_file = args.data_file;
    config.dry_run = config.dry_run || args.dry_run;

    pipeline::run(&config)
}
