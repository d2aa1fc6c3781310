use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};

use crate::app_config::FileConfig;
use crate::cli::Args;

/// Records which settings were given explicitly on the command line, so that
/// file config never overrides them.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) max_download_concurrency: bool,
    pub(crate) timeout_secs: bool,
    pub(crate) grace_period_secs: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    parse_cli_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
}

pub(crate) fn parse_cli_from<I, T>(itr: I) -> Result<(Args, CliValueSources), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = Args::command().try_get_matches_from(itr)?;
    let args = Args::from_arg_matches(&matches)?;

    let sources = CliValueSources {
        output_dir: is_commandline_value(&matches, "output_dir"),
        max_download_concurrency: is_commandline_value(&matches, "max_download_concurrency"),
        timeout_secs: is_commandline_value(&matches, "timeout_secs"),
        grace_period_secs: is_commandline_value(&matches, "grace_period_secs"),
    };
    Ok((args, sources))
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Args {
    let Some(file_config) = file_config else {
        return args;
    };

    if !cli_sources.output_dir
        && let Some(output_dir) = &file_config.output_dir
    {
        args.output_dir = output_dir.clone();
    }

    if !cli_sources.max_download_concurrency
        && let Some(concurrency) = file_config.max_download_concurrency
    {
        args.max_download_concurrency = concurrency;
    }

    if !cli_sources.timeout_secs
        && let Some(timeout) = file_config.timeout_secs
    {
        args.timeout_secs = timeout;
    }

    if !cli_sources.grace_period_secs
        && let Some(grace) = file_config.grace_period_secs
    {
        args.grace_period_secs = grace;
    }

    args
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
