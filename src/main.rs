//! CLI entry point for the snapurl tool.

mod app;
mod app_config;
mod cli;

/// Process outcome mapped onto an exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every URL was fetched and persisted.
    Success,
    /// Some URLs failed.
    Partial,
    /// Every URL failed, or the input could not be read.
    Failure,
    /// The grace period elapsed after an interrupt.
    Forced,
}

impl ProcessExit {
    pub(crate) fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
            Self::Forced => 130,
        }
    }
}

#[tokio::main]
async fn main() {
    let exit = match app::runtime::run_snapurl().await {
        Ok(exit) => exit,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ProcessExit::Failure
        }
    };

    // Exit explicitly so tasks abandoned by a forced exit do not hold the runtime open.
    std::process::exit(exit.code());
}
