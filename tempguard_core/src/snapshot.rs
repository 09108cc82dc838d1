//! Durable last-known-good copies of canonical sets
//!
//! Two on-disk shapes are supported:
//! - `Lines`: one entry per line (email domains)
//! - `JsonRecord`: `{"strong": [...]}` (phone numbers)
//!
//! Writes go to a sibling temporary file that is renamed over the snapshot,
//! so a reader never sees a half-written file.

use crate::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Lines,
    JsonRecord,
}

/// Structured snapshot record
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(default)]
    strong: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

/// Snapshot file for one detector
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a canonical set, creating the data directory if needed
    pub async fn save(&self, entries: &HashSet<String>) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error("create_dir", source))?;
        }

        let mut sorted: Vec<&String> = entries.iter().collect();
        sorted.sort();

        let content = match self.format {
            SnapshotFormat::Lines => sorted
                .iter()
                .map(|entry| entry.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            SnapshotFormat::JsonRecord => {
                let record = SnapshotRecord {
                    strong: sorted.into_iter().cloned().collect(),
                    saved_at: Some(Utc::now()),
                };
                serde_json::to_string(&record).map_err(|source| self.format_error(source))?
            }
        };

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|source| self.io_error("write", source))?;
        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error("rename", source));
        }

        tracing::debug!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    /// Read the stored entries as written (not re-normalized)
    pub async fn load(&self) -> Result<Vec<String>, SnapshotError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io_error("read", source))?;

        match self.format {
            SnapshotFormat::Lines => Ok(raw.lines().map(str::to_string).collect()),
            SnapshotFormat::JsonRecord => {
                let record: SnapshotRecord =
                    serde_json::from_str(&raw).map_err(|source| self.format_error(source))?;
                Ok(record.strong)
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, operation: &'static str, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.display().to_string(),
            operation,
            source,
        }
    }

    fn format_error(&self, source: serde_json::Error) -> SnapshotError {
        SnapshotError::Format {
            path: self.path.display().to_string(),
            source,
        }
    }
}
