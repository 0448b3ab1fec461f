//! Folder scanning and analysis.
//!
//! Walks the immediate children of a directory, builds a [`FileRecord`]
//! per regular file, and groups the records by [`Category`]. The scan
//! is metadata-only: file contents are never opened, and subdirectories
//! are skipped rather than classified.

use crate::category::Category;
use crate::config::CompiledFilters;
use crate::history::HISTORY_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One filesystem entry captured at scan time.
///
/// Immutable snapshot; `size` may go stale if the file changes after
/// the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Base filename including extension.
    pub name: String,
    /// Absolute path at time of scan.
    pub path: PathBuf,
    /// Byte length at time of scan.
    pub size: u64,
    /// Lowercase extension without the leading dot, empty if none.
    pub extension: String,
}

/// The result of scanning one folder: a partition of its top-level
/// regular files into categories.
///
/// Every scanned file appears in exactly one category list, in
/// directory-iteration order, and `total_files` equals the sum of the
/// list lengths. Only categories that received at least one file are
/// present as keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderAnalysis {
    /// Number of files scanned and classified.
    pub total_files: usize,
    /// Category label to the ordered files assigned to it.
    pub categories: HashMap<Category, Vec<FileRecord>>,
}

impl FolderAnalysis {
    /// Returns the files assigned to `category`, empty if none were.
    pub fn files_in(&self, category: Category) -> &[FileRecord] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Errors that abort a scan before it produces any analysis.
#[derive(Debug)]
pub enum ScanError {
    /// The folder path does not exist.
    NotFound { path: PathBuf },
    /// The path exists but is not a directory.
    NotADirectory { path: PathBuf },
    /// The directory exists but cannot be read.
    PermissionDenied { path: PathBuf },
    /// Listing the directory failed for another reason.
    ReadFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "Folder does not exist: {}", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Path is not a directory: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                write!(f, "Permission denied reading folder: {}", path.display())
            }
            Self::ReadFailed { path, source } => {
                write!(f, "Failed to read folder {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Scans the immediate children of `folder_path` and classifies every
/// regular file.
///
/// Equivalent to [`analyze_with_filters`] with permissive filters: all
/// top-level regular files are included, hidden files too. The history
/// file written by a previous organize run is the one fixed exception,
/// so an organize can never relocate its own log.
pub fn analyze(folder_path: &Path) -> ScanResult<FolderAnalysis> {
    analyze_with_filters(folder_path, &CompiledFilters::permissive())
}

/// Scans `folder_path`, skipping files rejected by `filters`.
///
/// Lists immediate children only; subdirectories are skipped, not
/// classified. Fails with [`ScanError::NotFound`],
/// [`ScanError::NotADirectory`], or [`ScanError::PermissionDenied`]
/// before touching anything.
pub fn analyze_with_filters(
    folder_path: &Path,
    filters: &CompiledFilters,
) -> ScanResult<FolderAnalysis> {
    if !folder_path.exists() {
        return Err(ScanError::NotFound {
            path: folder_path.to_path_buf(),
        });
    }
    if !folder_path.is_dir() {
        return Err(ScanError::NotADirectory {
            path: folder_path.to_path_buf(),
        });
    }

    let entries = fs::read_dir(folder_path).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => ScanError::PermissionDenied {
            path: folder_path.to_path_buf(),
        },
        _ => ScanError::ReadFailed {
            path: folder_path.to_path_buf(),
            source: e,
        },
    })?;

    let mut categories: HashMap<Category, Vec<FileRecord>> = HashMap::new();
    let mut total_files = 0;

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name == HISTORY_FILE_NAME {
            continue;
        }

        let path = entry.path();
        if !filters.should_include(&path) {
            continue;
        }

        let record = FileRecord {
            extension: extension_of(&name),
            size: entry.metadata().map(|m| m.len()).unwrap_or(0),
            name,
            path,
        };

        let category = Category::from_extension(&record.extension);
        categories.entry(category).or_default().push(record);
        total_files += 1;
    }

    Ok(FolderAnalysis {
        total_files,
        categories,
    })
}

/// Derives the extension from a file name: the text after the last `.`,
/// lowercased.
///
/// Names with no `.`, and dotfiles with no further `.` (".gitignore"),
/// yield an empty extension.
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        None | Some(0) => String::new(),
        Some(idx) => name[idx + 1..].to_lowercase(),
    }
}
