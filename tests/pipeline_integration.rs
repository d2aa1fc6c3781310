//! Integration tests for the full read → download → persist pipeline.
//!
//! Uses wiremock for HTTP and a temp directory for snapshots.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use snapurl_core::{
    ConfigError, FileStore, HttpFetcher, Pipeline, PipelineConfig, PipelineOutcome,
    ShutdownState, validate_concurrency,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

fn write_input(dir: &Path, urls: &[String]) -> PathBuf {
    let mut body = String::from("url\n");
    for url in urls {
        body.push_str(url);
        body.push('\n');
    }
    let input = dir.join("urls.csv");
    std::fs::write(&input, body).unwrap();
    input
}

async fn run_pipeline(input: &Path, output_dir: &Path, concurrency: i64) -> PipelineOutcome {
    let config = PipelineConfig::new(concurrency).unwrap();
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let store = FileStore::new(output_dir);
    let pipeline = Pipeline::new(config, Arc::new(fetcher), Arc::new(store)).unwrap();
    pipeline
        .run_file(input, future::pending::<()>())
        .await
        .unwrap()
}

fn snapshot_bodies(output_dir: &Path) -> BTreeSet<String> {
    let partition = FileStore::new(output_dir).partition_dir();
    if !partition.exists() {
        return BTreeSet::new();
    }
    std::fs::read_dir(partition)
        .unwrap()
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect()
}

#[tokio::test]
async fn test_all_successful_urls_are_snapshotted() {
    let mock_server = require_mock_server!();
    for name in ["a", "b", "c"] {
        Mock::given(method("GET"))
            .and(path(format!("/{name}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("body of {name}")))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let temp_dir = TempDir::new().unwrap();
    let urls: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|name| format!("{}/{name}", mock_server.uri()))
        .collect();
    let input = write_input(temp_dir.path(), &urls);
    let output_dir = temp_dir.path().join("out");

    let outcome = run_pipeline(&input, &output_dir, 2).await;

    assert_eq!(outcome.state, ShutdownState::Completed);
    assert!(!outcome.interrupted);
    assert_eq!(outcome.urls_read, Some(3));
    assert_eq!(outcome.summary.total, 3);
    assert_eq!(outcome.summary.successful, 3);
    assert_eq!(outcome.summary.failed, 0);
    assert_eq!(outcome.summary.success_percentage, Some(100.0));

    let expected: BTreeSet<String> = ["body of a", "body of b", "body of c"]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(snapshot_bodies(&output_dir), expected);
}

#[tokio::test]
async fn test_non_utf8_body_is_persisted_byte_for_byte() {
    let mock_server = require_mock_server!();
    let raw: Vec<u8> = vec![0x63, 0x61, 0x66, 0xe9, 0x0a, 0xff, 0x00, 0x41];
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(raw.clone(), "text/plain; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), &[format!("{}/latin1", mock_server.uri())]);
    let output_dir = temp_dir.path().join("out");

    let outcome = run_pipeline(&input, &output_dir, 1).await;

    assert_eq!(outcome.summary.successful, 1);
    let partition = FileStore::new(&output_dir).partition_dir();
    let stored: Vec<Vec<u8>> = std::fs::read_dir(partition)
        .unwrap()
        .map(|entry| std::fs::read(entry.unwrap().path()).unwrap())
        .collect();
    assert_eq!(stored, vec![raw]);
}

#[tokio::test]
async fn test_server_error_is_counted_and_not_persisted() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/ok", mock_server.uri()),
        format!("{}/broken", mock_server.uri()),
    ];
    let input = write_input(temp_dir.path(), &urls);
    let output_dir = temp_dir.path().join("out");

    let outcome = run_pipeline(&input, &output_dir, 50).await;

    assert!(outcome.is_completed());
    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.summary.successful, 1);
    assert_eq!(outcome.summary.failed, 1);
    assert_eq!(outcome.summary.persist_failed, 0);
    assert_eq!(outcome.summary.success_percentage, Some(50.0));
    assert_eq!(outcome.summary.failure_percentage, Some(50.0));
    assert_eq!(snapshot_bodies(&output_dir).len(), 1);
}

#[tokio::test]
async fn test_header_only_input_completes_without_requests() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path(), &[]);
    let output_dir = temp_dir.path().join("out");

    let outcome = run_pipeline(&input, &output_dir, 1).await;

    assert!(outcome.is_completed());
    assert_eq!(outcome.urls_read, Some(0));
    assert_eq!(outcome.summary.total, 0);
    assert_eq!(outcome.summary.success_percentage, None);
    assert_eq!(outcome.summary.average_fetch_ms, None);
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_unreachable_output_dir_counts_persist_failures() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("content"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let urls = vec![
        format!("{}/one", mock_server.uri()),
        format!("{}/two", mock_server.uri()),
    ];
    let input = write_input(temp_dir.path(), &urls);
    let output_dir = temp_dir.path().join("not-a-dir");
    std::fs::write(&output_dir, "occupied").unwrap();

    let outcome = run_pipeline(&input, &output_dir, 2).await;

    assert!(outcome.is_completed());
    assert_eq!(outcome.summary.total, 2);
    assert_eq!(outcome.summary.successful, 0);
    assert_eq!(outcome.summary.failed, 2);
    assert_eq!(outcome.summary.persist_failed, 2);
    assert!(outcome.summary.is_reconciled());
}

#[tokio::test]
async fn test_blank_lines_and_whitespace_are_ignored() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/trimmed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("trimmed body"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("urls.csv");
    std::fs::write(
        &input,
        format!("header\n\n   \n  {}/trimmed  \n\n", mock_server.uri()),
    )
    .unwrap();
    let output_dir = temp_dir.path().join("out");

    let outcome = run_pipeline(&input, &output_dir, 4).await;

    assert_eq!(outcome.urls_read, Some(1));
    assert_eq!(outcome.summary.successful, 1);
    assert_eq!(
        snapshot_bodies(&output_dir),
        BTreeSet::from(["trimmed body".to_string()])
    );
}

#[tokio::test]
async fn test_missing_input_file_is_a_startup_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = PipelineConfig::new(1).unwrap();
    let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
    let store = FileStore::new(temp_dir.path());
    let pipeline = Pipeline::new(config, Arc::new(fetcher), Arc::new(store)).unwrap();

    let result = pipeline
        .run_file(temp_dir.path().join("absent.csv"), future::pending::<()>())
        .await;

    assert!(matches!(
        result,
        Err(snapurl_core::PipelineError::Source(
            snapurl_core::SourceError::Unavailable { .. }
        ))
    ));
}

#[test]
fn test_concurrency_validation_is_exported() {
    assert_eq!(validate_concurrency(8), Ok(8));
    assert_eq!(validate_concurrency(0), Err(ConfigError::ZeroConcurrency));
    assert_eq!(
        validate_concurrency(-1),
        Err(ConfigError::NegativeConcurrency { value: -1 })
    );
}
