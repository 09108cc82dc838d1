//! Error types for list acquisition and snapshot persistence
//!
//! None of these reach detector callers. Sources that fail contribute nothing
//! to a refresh, and snapshot failures leave the in-memory set untouched; the
//! types exist so those cases can be told apart in logs and tests.

use thiserror::Error;

/// A remote list source could not be used for this refresh cycle
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Snapshot read/write failure
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SnapshotError {
    /// Whether the snapshot simply does not exist yet (first run)
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            SnapshotError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
