//! Move-log persistence for the CLI shell.
//!
//! The engine itself is stateless: execution hands the move log back to
//! the caller and forgets it. The CLI is that caller, and it retains
//! the log the only way a process that exits can, as a JSON file inside
//! the organized folder. The scanner knows the file's name and always
//! excludes it, so a later organize run never relocates its own log.

use crate::planner::MoveRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the persisted move log inside an organized folder.
pub const HISTORY_FILE_NAME: &str = ".tidydesk_history.json";

/// A persisted move log: the executed moves of one organize run plus
/// enough context to describe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFile {
    /// RFC 3339 timestamp of when the organization ran.
    pub timestamp: String,
    /// The folder that was organized.
    pub root: PathBuf,
    /// The executed moves, in execution order.
    pub moves: Vec<MoveRecord>,
}

/// Errors from reading or writing the persisted move log.
#[derive(Debug)]
pub enum HistoryError {
    /// No history file exists for this folder.
    NothingToUndo { root: PathBuf },
    /// The history file could not be written.
    WriteFailed { path: PathBuf, source: io::Error },
    /// The history file could not be read.
    ReadFailed { path: PathBuf, source: io::Error },
    /// The history file exists but does not parse.
    InvalidFormat { path: PathBuf, reason: String },
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToUndo { root } => {
                write!(f, "No previous organization found in {}", root.display())
            }
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write history {}: {}", path.display(), source)
            }
            Self::ReadFailed { path, source } => {
                write!(f, "Failed to read history {}: {}", path.display(), source)
            }
            Self::InvalidFormat { path, reason } => {
                write!(f, "Invalid history file {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Result type for history persistence.
pub type HistoryResult<T> = Result<T, HistoryError>;

impl HistoryFile {
    /// Wraps an executed move log for persistence, stamped with the
    /// current time.
    pub fn new(root: PathBuf, moves: Vec<MoveRecord>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            moves,
        }
    }

    fn path_for(root: &Path) -> PathBuf {
        root.join(HISTORY_FILE_NAME)
    }

    /// Writes this log as pretty JSON into its root folder.
    pub fn save(&self) -> HistoryResult<()> {
        let path = Self::path_for(&self.root);
        let json = serde_json::to_string_pretty(self).map_err(|e| HistoryError::InvalidFormat {
            path: path.clone(),
            reason: format!("serialization failed: {}", e),
        })?;
        fs::write(&path, json).map_err(|source| HistoryError::WriteFailed { path, source })
    }

    /// Loads the persisted log for `root`, or `NothingToUndo` if none
    /// exists.
    pub fn load(root: &Path) -> HistoryResult<Self> {
        let path = Self::path_for(root);
        if !path.exists() {
            return Err(HistoryError::NothingToUndo {
                root: root.to_path_buf(),
            });
        }
        let json = fs::read_to_string(&path).map_err(|source| HistoryError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|e| HistoryError::InvalidFormat {
            path,
            reason: e.to_string(),
        })
    }

    /// Removes the persisted log for `root`, if present.
    pub fn delete(root: &Path) -> HistoryResult<()> {
        let path = Self::path_for(root);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| HistoryError::WriteFailed { path, source })?;
        }
        Ok(())
    }
}
