//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use snapurl_core::{
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_GRACE_PERIOD_SECS, DEFAULT_MAX_DOWNLOAD_CONCURRENCY,
};

/// Default directory for persisted snapshots.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Download a list of URLs and snapshot each response to disk.
///
/// The input file's first line is a header and is skipped; every following
/// non-blank line is fetched once. Successful bodies are written under
/// `<output-dir>/<YYYY-MM-DD>/`.
#[derive(Parser, Debug, Clone)]
#[command(name = "snapurl")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the input file (first line is a header)
    #[arg(long = "file-path", visible_alias = "filePath", value_name = "PATH")]
    pub file_path: PathBuf,

    /// Maximum number of concurrent downloads (must be at least 1)
    #[arg(
        short = 'c',
        long,
        visible_alias = "maxDownloadConcurrency",
        value_name = "N",
        default_value_t = DEFAULT_MAX_DOWNLOAD_CONCURRENCY as i64,
        allow_negative_numbers = true
    )]
    pub max_download_concurrency: i64,

    /// Directory where snapshots are written
    #[arg(short = 'o', long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Per-request timeout in seconds (1-3600)
    #[arg(short = 't', long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: u64,

    /// Seconds to let in-flight work finish after an interrupt (0-600)
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD_SECS, value_parser = clap::value_parser!(u64).range(0..=600))]
    pub grace_period_secs: u64,

    /// Print the final run summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
