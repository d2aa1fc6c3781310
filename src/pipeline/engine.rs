//! Pipeline orchestrator.
//!
//! Wires three stages together with two bounded queues:
//!
//! ```text
//! UrlSource ──urls──▶ download stage (gate-bounded fetch tasks) ──contents──▶ store stage
//! ```
//!
//! Each queue is closed by its producer dropping the last sender. The download
//! stage only releases its sender once the URL queue is closed and every fetch
//! task it spawned has finished, so the store stage ends exactly when all work
//! has been handed over.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snapurl_core::fetch::HttpFetcher;
//! use snapurl_core::pipeline::{Pipeline, PipelineConfig, wait_for_signal};
//! use snapurl_core::store::FileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(
//!     PipelineConfig::new(50)?,
//!     Arc::new(HttpFetcher::new(Duration::from_secs(10))?),
//!     Arc::new(FileStore::new("downloads")),
//! )?;
//! let outcome = pipeline.run_file("urls.csv", wait_for_signal()).await?;
//! println!("{} of {} persisted", outcome.summary.successful, outcome.summary.total);
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, instrument, warn};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::gate::{AdmissionGate, AdmissionPermit};
use super::shutdown::{ShutdownController, ShutdownState};
use super::stats::{RunStats, RunSummary};
use crate::fetch::Fetcher;
use crate::source::{SourceError, UrlSource};
use crate::store::Store;

/// Body of one successful fetch, in transit to the store stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// URL the body was fetched from (log context only).
    pub url: String,
    /// Raw response body.
    pub body: Vec<u8>,
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Terminal state: [`ShutdownState::Completed`] or [`ShutdownState::ForcedExit`].
    pub state: ShutdownState,
    /// Whether an interrupt was observed before completion.
    pub interrupted: bool,
    /// Statistics at the time the run returned. Not reconciled after a forced exit.
    pub summary: RunSummary,
    /// Number of URLs the source emitted, when the source stage finished.
    pub urls_read: Option<usize>,
    /// Mid-stream read failure of the source stage, if any.
    pub source_error: Option<SourceError>,
}

impl PipelineOutcome {
    /// Returns true when every stage drained.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == ShutdownState::Completed
    }
}

/// Three-stage read → download → persist pipeline.
///
/// A pipeline runs once; [`run`](Self::run) consumes it. Grab
/// [`stats`](Self::stats) or [`subscribe`](Self::subscribe) beforehand to
/// observe a run from outside.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn Store>,
    gate: AdmissionGate,
    stats: Arc<RunStats>,
    shutdown: ShutdownController,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("state", &self.shutdown.state())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Creates a pipeline from validated configuration and its I/O adapters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if the admission gate cannot be built.
    #[instrument(level = "debug", skip(fetcher, store))]
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn Store>,
    ) -> Result<Self, PipelineError> {
        let gate = AdmissionGate::new(config.max_download_concurrency())?;
        Ok(Self {
            config,
            fetcher,
            store,
            gate,
            stats: Arc::new(RunStats::new()),
            shutdown: ShutdownController::new(),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns a handle to the live statistics.
    #[must_use]
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Returns a handle to the admission gate.
    #[must_use]
    pub fn gate(&self) -> AdmissionGate {
        self.gate.clone()
    }

    /// Returns a receiver that observes state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.shutdown.subscribe()
    }

    /// Opens `path` and runs the pipeline over it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Source`] if the file cannot be opened. Nothing
    /// is spawned in that case.
    pub async fn run_file<F>(
        self,
        path: impl AsRef<Path>,
        interrupt: F,
    ) -> Result<PipelineOutcome, PipelineError>
    where
        F: Future<Output = ()> + Send,
    {
        let source = UrlSource::open(path).await?;
        Ok(self.run(source, interrupt).await)
    }

    /// Runs every stage to completion, or until `interrupt` resolves and the
    /// grace period runs out.
    ///
    /// Per-item failures never abort the run; they are counted and logged.
    /// On [`ShutdownState::ForcedExit`] the stage tasks are left running
    /// detached and their outcomes are not reflected in the summary.
    #[instrument(skip_all, fields(
        path = %source.path().display(),
        concurrency = self.gate.capacity(),
    ))]
    pub async fn run<F>(self, source: UrlSource, interrupt: F) -> PipelineOutcome
    where
        F: Future<Output = ()> + Send,
    {
        let Self {
            config,
            fetcher,
            store,
            gate,
            stats,
            shutdown,
        } = self;

        let (url_tx, url_rx) = mpsc::channel(config.queue_capacity());
        let (content_tx, content_rx) = mpsc::channel(config.queue_capacity());

        info!("starting pipeline");

        let source_task = tokio::spawn(read_stage(source, url_tx, shutdown.clone()));
        let download_task = tokio::spawn(download_stage(
            url_rx,
            content_tx,
            fetcher,
            gate,
            Arc::clone(&stats),
        ));
        let mut store_task = tokio::spawn(store_stage(content_rx, store, Arc::clone(&stats)));

        tokio::pin!(interrupt);
        let interrupted = tokio::select! {
            biased;
            joined = &mut store_task => {
                log_stage_exit("store", joined);
                false
            }
            () = &mut interrupt => true,
        };

        if interrupted {
            shutdown.transition(ShutdownState::InterruptedDraining);
            warn!(
                grace_ms = config.grace_period().as_millis(),
                seen = stats.total(),
                "interrupt received; waiting for in-flight work"
            );
            if let Ok(joined) = tokio::time::timeout(config.grace_period(), &mut store_task).await
            {
                log_stage_exit("store", joined);
            } else {
                shutdown.transition(ShutdownState::ForcedExit);
                let summary = stats.summary();
                error!(
                    total = summary.total,
                    successful = summary.successful,
                    failed = summary.failed,
                    "grace period elapsed; abandoning in-flight work"
                );
                return PipelineOutcome {
                    state: ShutdownState::ForcedExit,
                    interrupted,
                    summary,
                    urls_read: None,
                    source_error: None,
                };
            }
        }

        shutdown.transition(ShutdownState::Completed);
        log_stage_exit("download", download_task.await);
        let (urls_read, source_error) = match source_task.await {
            Ok(Ok(sent)) => (Some(sent), None),
            Ok(Err(e)) => (None, Some(e)),
            Err(e) => {
                error!(stage = "source", error = %e, "stage task failed");
                (None, None)
            }
        };

        let summary = stats.summary();
        info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            interrupted,
            "pipeline complete"
        );

        PipelineOutcome {
            state: ShutdownState::Completed,
            interrupted,
            summary,
            urls_read,
            source_error,
        }
    }
}

async fn read_stage(
    source: UrlSource,
    urls: mpsc::Sender<String>,
    shutdown: ShutdownController,
) -> Result<usize, SourceError> {
    let result = source.forward_to(urls.clone()).await;
    match &result {
        Ok(sent) => debug!(sent, "source stage finished"),
        Err(e) => error!(error = %e, "URL source failed; draining items already queued"),
    }
    // Enter Draining before the last sender goes away so the queue close is
    // never observed ahead of the state change.
    shutdown.transition(ShutdownState::Draining);
    drop(urls);
    result
}

#[instrument(skip_all, fields(concurrency = gate.capacity()))]
async fn download_stage(
    mut urls: mpsc::Receiver<String>,
    contents: mpsc::Sender<FetchedContent>,
    fetcher: Arc<dyn Fetcher>,
    gate: AdmissionGate,
    stats: Arc<RunStats>,
) {
    let mut tasks = JoinSet::new();

    while let Some(url) = urls.recv().await {
        stats.record_url_seen();

        let permit = match gate.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!(url = %url, error = %e, "cannot admit fetch");
                stats.record_fetch_failure();
                continue;
            }
        };

        while let Some(joined) = tasks.try_join_next() {
            reap_fetch_task(joined, &stats);
        }

        debug!(url = %url, in_flight = gate.in_flight(), "admitted fetch");
        tasks.spawn(fetch_one(
            url,
            permit,
            Arc::clone(&fetcher),
            contents.clone(),
            Arc::clone(&stats),
        ));
    }

    drop(contents);
    debug!(
        pending = tasks.len(),
        "URL queue closed; waiting for in-flight fetches"
    );
    while let Some(joined) = tasks.join_next().await {
        reap_fetch_task(joined, &stats);
    }
    debug!("download stage finished");
}

async fn fetch_one(
    url: String,
    permit: AdmissionPermit,
    fetcher: Arc<dyn Fetcher>,
    contents: mpsc::Sender<FetchedContent>,
    stats: Arc<RunStats>,
) {
    let started = Instant::now();
    let result = fetcher.fetch(&url).await;
    let elapsed = started.elapsed();
    drop(permit);

    match result {
        Ok(body) => {
            debug!(
                url = %url,
                elapsed_ms = elapsed.as_millis(),
                bytes = body.len(),
                "fetch succeeded"
            );
            // Only items handed to the store stage contribute to the fetch duration.
            match contents.send(FetchedContent { url, body }).await {
                Ok(()) => stats.record_fetch_duration(elapsed),
                Err(mpsc::error::SendError(item)) => {
                    stats.record_fetch_failure();
                    warn!(url = %item.url, "content queue closed; dropping fetched item");
                }
            }
        }
        Err(e) => {
            stats.record_fetch_failure();
            warn!(url = %url, error = %e, "fetch failed");
        }
    }
}

/// A fetch task that panicked or was cancelled never recorded its outcome.
fn reap_fetch_task(joined: Result<(), JoinError>, stats: &RunStats) {
    if let Err(e) = joined {
        warn!(error = %e, "fetch task did not finish; counting as failed");
        stats.record_fetch_failure();
    }
}

#[instrument(skip_all)]
async fn store_stage(
    mut contents: mpsc::Receiver<FetchedContent>,
    store: Arc<dyn Store>,
    stats: Arc<RunStats>,
) {
    while let Some(item) = contents.recv().await {
        match store.persist(&item.body).await {
            Ok(path) => {
                stats.record_success();
                info!(url = %item.url, path = %path.display(), "content persisted");
            }
            Err(e) => {
                stats.record_persist_failure();
                warn!(url = %item.url, error = %e, "persist failed");
            }
        }
    }
    debug!("persistence complete");
}

fn log_stage_exit(stage: &'static str, joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(stage, error = %e, "stage task failed");
    }
}
