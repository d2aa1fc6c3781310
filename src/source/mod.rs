//! URL list reader.
//!
//! The input is UTF-8 text. The first line is a header and is always skipped;
//! every following line is trimmed and, when non-empty, yields one URL. Lines
//! are read lazily so arbitrarily large lists never sit in memory.

mod error;

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

pub use error::SourceError;

/// Lazy, single-pass reader over a URL list file.
#[derive(Debug)]
pub struct UrlSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: usize,
    header_skipped: bool,
    exhausted: bool,
}

impl UrlSource {
    /// Opens the URL list at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|source| SourceError::Unavailable {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_number: 0,
            header_skipped: false,
            exhausted: false,
        })
    }

    /// Returns the path being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the next URL, or `None` once the file is exhausted.
    ///
    /// After an error the source is exhausted and keeps returning `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] when a line cannot be read or decoded.
    pub async fn next_url(&mut self) -> Result<Option<String>, SourceError> {
        while !self.exhausted {
            let next = self.lines.next_line().await;
            self.line_number += 1;
            let line = match next {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.exhausted = true;
                    break;
                }
                Err(source) => {
                    self.exhausted = true;
                    return Err(SourceError::Read {
                        path: self.path.clone(),
                        line: self.line_number,
                        source,
                    });
                }
            };

            if !self.header_skipped {
                self.header_skipped = true;
                continue;
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
        Ok(None)
    }

    /// Drains the source into `urls`, in file order, and returns how many URLs
    /// were sent. Dropping `urls` on return closes the queue.
    ///
    /// Stops early without error if the receiving side has gone away.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] on a mid-stream read failure; URLs sent
    /// before the failure stay on the queue.
    #[instrument(skip(self, urls), fields(path = %self.path.display()))]
    pub async fn forward_to(mut self, urls: mpsc::Sender<String>) -> Result<usize, SourceError> {
        let mut sent = 0usize;
        while let Some(url) = self.next_url().await? {
            if urls.send(url).await.is_err() {
                debug!(sent, "URL queue closed by consumer; stopping source");
                break;
            }
            sent += 1;
        }
        debug!(sent, "URL source exhausted");
        Ok(sent)
    }

    /// Reads every remaining URL into a vector.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Read`] on a read failure.
    pub async fn collect(mut self) -> Result<Vec<String>, SourceError> {
        let mut urls = Vec::new();
        while let Some(url) = self.next_url().await? {
            urls.push(url);
        }
        Ok(urls)
    }
}
