//! Exit code logic for the snapurl process.
//!
//! Single responsibility: map a pipeline outcome to the process exit outcome.

use snapurl_core::{PipelineOutcome, ShutdownState};

use crate::ProcessExit;

/// Determines the process exit outcome from a finished run.
pub(crate) fn determine_exit_outcome(outcome: &PipelineOutcome) -> ProcessExit {
    if outcome.state == ShutdownState::ForcedExit {
        return ProcessExit::Forced;
    }
    if outcome.source_error.is_some() && outcome.summary.total == 0 {
        return ProcessExit::Failure;
    }
    let summary = &outcome.summary;
    if summary.failed == 0 && outcome.source_error.is_none() {
        ProcessExit::Success
    } else if summary.successful > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
