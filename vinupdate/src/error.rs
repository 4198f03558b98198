//! Error types for update discovery and download.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Errors that can occur while querying for or downloading updates.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Caller-supplied input was rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request could not be issued or the transport failed.
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Server { url: String, status: u16 },

    /// The server ignored a byte-range request while resuming.
    #[error("server ignored range request for {url} (resume offset {offset})")]
    RangeIgnored { url: String, offset: u64 },

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The local output file could not be opened for appending.
    #[error("failed to open {}: {source}", .path.display())]
    OpenFile { path: PathBuf, source: io::Error },

    /// Streaming failed after the transfer started.
    #[error("transfer to {} failed after {written} bytes: {reason}", .path.display())]
    Transfer {
        path: PathBuf,
        written: u64,
        reason: String,
    },

    /// The transfer was cancelled by the caller.
    #[error("transfer to {} cancelled after {written} bytes", .path.display())]
    Cancelled { path: PathBuf, written: u64 },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl UpdateError {
    /// Build a network error from a reqwest failure.
    pub(crate) fn network(url: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else {
            err.to_string()
        };
        Self::Network {
            url: url.to_string(),
            reason,
        }
    }

    /// Returns true if the partial output file is left in place and the
    /// download can be resumed by running it again.
    pub fn is_resumable(&self) -> bool {
        matches!(
            self,
            Self::Transfer { .. } | Self::Cancelled { .. } | Self::Network { .. }
        )
    }
}
