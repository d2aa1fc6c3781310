use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use snapurl_core::{
    FileStore, HttpFetcher, Pipeline, PipelineConfig, PipelineError, wait_for_signal,
};
use tracing::{debug, info};

use crate::app::{config_runtime, exit_handler, output, terminal};
use crate::{ProcessExit, app_config};

pub(crate) async fn run_snapurl() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();

    let loaded = app_config::load_default_file_config()?;
    let args = config_runtime::apply_config_defaults(args, &cli_sources, loaded.config.as_ref());

    terminal::init_tracing(config_runtime::resolve_default_log_level(&args));

    debug!(?args, "CLI arguments parsed");
    if loaded.config.is_some()
        && let Some(path) = &loaded.path
    {
        debug!(path = %path.display(), "Loaded config file");
    }

    let config = PipelineConfig::new(args.max_download_concurrency)
        .with_context(|| {
            format!(
                "Invalid --max-download-concurrency value {}",
                args.max_download_concurrency
            )
        })?
        .with_grace_period(Duration::from_secs(args.grace_period_secs));

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))
        .context("Failed to build HTTP client")?;
    let store = FileStore::new(&args.output_dir);

    info!(
        file = %args.file_path.display(),
        output_dir = %args.output_dir.display(),
        concurrency = config.max_download_concurrency(),
        timeout_secs = args.timeout_secs,
        "snapurl starting"
    );

    let pipeline = Pipeline::new(config, Arc::new(fetcher), Arc::new(store))?;
    let outcome = match pipeline.run_file(&args.file_path, wait_for_signal()).await {
        Ok(outcome) => outcome,
        Err(PipelineError::Source(e)) => {
            return Err(e).context("Failed to open input file");
        }
        Err(e) => return Err(e.into()),
    };

    output::report_summary(&outcome);
    if args.summary_json {
        output::print_summary_json(&outcome)?;
    }

    Ok(exit_handler::determine_exit_outcome(&outcome))
}
