//! Run summary formatting and display helpers.

use anyhow::Result;
use serde::Serialize;
use snapurl_core::{PipelineOutcome, RunSummary, ShutdownState};
use tracing::{error, info, warn};

/// Placeholder for figures that are undefined on an empty run.
pub(crate) const UNDEFINED_FIGURE: &str = "n/a";

fn format_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_FIGURE.to_string(), |v| format!("{v:.2}%"))
}

fn format_millis(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED_FIGURE.to_string(), |v| format!("{v:.2}ms"))
}

/// Human-readable summary lines, in display order.
pub(crate) fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("total URL processed from file: {}", summary.total),
        format!(
            "success percentage: {}",
            format_percentage(summary.success_percentage)
        ),
        format!(
            "failure percentage: {}",
            format_percentage(summary.failure_percentage)
        ),
        format!(
            "average download duration: {}",
            format_millis(summary.average_fetch_ms)
        ),
    ];
    if summary.persist_failed > 0 {
        lines.push(format!(
            "failed to persist after download: {}",
            summary.persist_failed
        ));
    }
    lines
}

/// Logs the outcome of a run.
pub(crate) fn report_summary(outcome: &PipelineOutcome) {
    if let Some(source_error) = &outcome.source_error {
        error!(error = %source_error, "input file could not be read to the end");
    }
    match outcome.state {
        ShutdownState::ForcedExit => {
            warn!("forced exit; in-flight downloads were abandoned and are not counted");
        }
        _ if outcome.interrupted => info!("interrupted; in-flight work drained before exit"),
        _ => {}
    }
    for line in summary_lines(&outcome.summary) {
        info!("{line}");
    }
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    state: ShutdownState,
    interrupted: bool,
    urls_read: Option<usize>,
    source_error: Option<String>,
    #[serde(flatten)]
    summary: &'a RunSummary,
}

/// Serializes the outcome as a single JSON object.
pub(crate) fn summary_json(outcome: &PipelineOutcome) -> Result<String> {
    let report = SummaryReport {
        state: outcome.state,
        interrupted: outcome.interrupted,
        urls_read: outcome.urls_read,
        source_error: outcome.source_error.as_ref().map(ToString::to_string),
        summary: &outcome.summary,
    };
    Ok(serde_json::to_string(&report)?)
}

/// Prints the JSON summary on stdout.
pub(crate) fn print_summary_json(outcome: &PipelineOutcome) -> Result<()> {
    println!("{}", summary_json(outcome)?);
    Ok(())
}
