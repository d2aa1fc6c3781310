//! Shutdown and drain state machine, plus OS signal handling.
//!
//! ```text
//! Running ──source closed──▶ Draining ──store done──▶ Completed
//!    │                          │                         ▲
//!    └──────interrupt───────────┴──▶ InterruptedDraining ─┤ store done within grace
//!                                          │
//!                                          └─grace elapsed─▶ ForcedExit
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

/// Lifecycle state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownState {
    /// All stages active.
    Running,
    /// Input exhausted; downstream stages finishing.
    Draining,
    /// Every stage finished.
    Completed,
    /// An interrupt arrived; waiting out the grace period.
    InterruptedDraining,
    /// The grace period elapsed before the stages finished.
    ForcedExit,
}

impl ShutdownState {
    /// Returns true for states that never change again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::ForcedExit)
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Running, Self::Draining)
                | (
                    Self::Running | Self::Draining,
                    Self::Completed | Self::InterruptedDraining
                )
                | (Self::InterruptedDraining, Self::Completed | Self::ForcedExit)
        )
    }
}

impl fmt::Display for ShutdownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Draining => write!(f, "draining"),
            Self::Completed => write!(f, "completed"),
            Self::InterruptedDraining => write!(f, "interrupted-draining"),
            Self::ForcedExit => write!(f, "forced-exit"),
        }
    }
}

/// Owner of the current [`ShutdownState`]. Clones share the same state.
#[derive(Debug, Clone)]
pub struct ShutdownController {
    state: Arc<watch::Sender<ShutdownState>>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    /// Creates a controller in [`ShutdownState::Running`].
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self {
            state: Arc::new(state),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    /// Returns a receiver that observes every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// Moves to `next` if the transition is legal. Returns whether it happened.
    pub fn transition(&self, next: ShutdownState) -> bool {
        let mut previous = None;
        let changed = self.state.send_if_modified(|current| {
            if current.can_transition_to(next) {
                previous = Some(*current);
                *current = next;
                true
            } else {
                false
            }
        });

        if let Some(previous) = previous {
            info!(from = %previous, to = %next, "pipeline state changed");
        } else {
            debug!(current = %self.state(), requested = %next, "ignored illegal state transition");
        }
        changed
    }
}

/// Waits for an operator termination request.
///
/// - **Unix:** SIGTERM or SIGINT, falling back to `ctrl_c` if registration fails.
/// - **Other platforms:** Ctrl+C.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM signal"),
                _ = sigint.recv() => info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C signal");
            } else {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Waits for an operator termination request.
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}
