//! Plan execution against the real filesystem.
//!
//! Moves are performed strictly in plan order, one at a time, so the
//! move log stays well-ordered and collision handling stays
//! deterministic. Every successful move is appended to the returned
//! log; per-item problems (vanished source, failed rename) are reported
//! in the summary and never abort the rest of the batch.

use crate::planner::{MoveRecord, next_free_path};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Why a planned move did not make it into the move log.
#[derive(Debug)]
pub enum SkipReason {
    /// The source vanished between planning and execution.
    SourceMissing,
    /// The destination directory could not be created.
    DirectoryCreationFailed(io::Error),
    /// The relocation itself failed.
    MoveFailed(io::Error),
    /// Cross-device copy wrote fewer bytes than the source holds; the
    /// partial copy was removed and the source left untouched.
    CopyVerificationFailed { expected: u64, copied: u64 },
    /// The file was copied but the original could not be deleted.
    SourceRemovalFailed(io::Error),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing => write!(f, "source no longer exists"),
            Self::DirectoryCreationFailed(e) => {
                write!(f, "could not create destination directory: {}", e)
            }
            Self::MoveFailed(e) => write!(f, "move failed: {}", e),
            Self::CopyVerificationFailed { expected, copied } => {
                write!(
                    f,
                    "copy verification failed: wrote {} of {} bytes, source kept",
                    copied, expected
                )
            }
            Self::SourceRemovalFailed(e) => {
                write!(f, "copied but could not remove original: {}", e)
            }
        }
    }
}

/// The outcome of executing one batch of planned moves.
///
/// `moves` is the move log: every successful relocation (no-ops
/// included), in the order performed. It is the only state needed to
/// undo the batch. Skipped and failed items are reported here but
/// excluded from the log, since nothing moved for them.
#[derive(Debug)]
pub struct ExecutionReport {
    /// Successful moves in execution order.
    pub moves: Vec<MoveRecord>,
    /// Planned moves that were skipped or failed, with the reason.
    pub not_moved: Vec<(PathBuf, SkipReason)>,
    /// Total number of planned moves processed.
    pub planned: usize,
}

impl ExecutionReport {
    /// Human-readable summary of moved vs. skipped counts, with one
    /// line per problem item.
    pub fn message(&self) -> String {
        let mut summary = format!(
            "Organized {} of {} files",
            self.moves.len(),
            self.planned
        );
        if self.not_moved.is_empty() {
            summary.push('.');
            return summary;
        }
        summary.push_str(&format!(" ({} not moved):", self.not_moved.len()));
        for (path, reason) in &self.not_moved {
            summary.push_str(&format!("\n  - {}: {}", path.display(), reason));
        }
        summary
    }

    /// True when every planned move landed in the log.
    pub fn is_complete_success(&self) -> bool {
        self.not_moved.is_empty()
    }
}

/// Executes `moves` in order. See [`execute_with`].
pub fn execute(moves: &[MoveRecord]) -> ExecutionReport {
    execute_with(moves, |_| {})
}

/// Executes `moves` in order, invoking `observer` after each item is
/// processed (moved, skipped, or failed) so a caller can render
/// progress.
///
/// Destination directories are created lazily per move; a directory
/// creation failure aborts that single move only. A destination that
/// came into existence since planning is re-resolved with the same
/// suffix policy the planner uses, so nothing is ever overwritten.
/// No-op moves (source == destination) succeed without touching the
/// filesystem.
pub fn execute_with(
    moves: &[MoveRecord],
    mut observer: impl FnMut(&MoveRecord),
) -> ExecutionReport {
    let mut report = ExecutionReport {
        moves: Vec::new(),
        not_moved: Vec::new(),
        planned: moves.len(),
    };

    for planned in moves {
        execute_one(planned, &mut report);
        observer(planned);
    }

    report
}

fn execute_one(planned: &MoveRecord, report: &mut ExecutionReport) {
    if planned.is_noop() {
        report.moves.push(planned.clone());
        return;
    }

    if !planned.source_path.exists() {
        report
            .not_moved
            .push((planned.source_path.clone(), SkipReason::SourceMissing));
        return;
    }

    if let Some(parent) = planned.destination_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        report.not_moved.push((
            planned.source_path.clone(),
            SkipReason::DirectoryCreationFailed(e),
        ));
        return;
    }

    // The planner checked at plan time; re-resolve if something raced
    // in since. Never overwrite.
    let destination = if planned.destination_path.exists() {
        next_free_path(&planned.destination_path, |p| p.exists())
    } else {
        planned.destination_path.clone()
    };

    match relocate(&planned.source_path, &destination) {
        Ok(()) => report.moves.push(MoveRecord {
            source_path: planned.source_path.clone(),
            destination_path: destination,
            category: planned.category,
        }),
        Err(reason) => report.not_moved.push((planned.source_path.clone(), reason)),
    }
}

/// Moves one file, atomically when possible.
///
/// Tries `rename()` first. On a cross-device error, falls back to copy
/// then delete, verifying the copied byte count against the source
/// before the original is removed. The source is never deleted unless
/// the destination write fully completed.
pub(crate) fn relocate(source: &Path, destination: &Path) -> Result<(), SkipReason> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => copy_then_delete(source, destination),
        Err(e) => Err(SkipReason::MoveFailed(e)),
    }
}

fn copy_then_delete(source: &Path, destination: &Path) -> Result<(), SkipReason> {
    let expected = fs::metadata(source)
        .map_err(SkipReason::MoveFailed)?
        .len();
    let copied = fs::copy(source, destination).map_err(SkipReason::MoveFailed)?;

    if copied != expected {
        // Drop the partial copy; the source stays authoritative.
        let _ = fs::remove_file(destination);
        return Err(SkipReason::CopyVerificationFailed { expected, copied });
    }

    fs::remove_file(source).map_err(SkipReason::SourceRemovalFailed)
}

fn is_cross_device(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use tempfile::TempDir;

    fn record(source: PathBuf, destination: PathBuf, category: Category) -> MoveRecord {
        MoveRecord {
            source_path: source,
            destination_path: destination,
            category,
        }
    }

    #[test]
    fn test_execute_moves_file_and_creates_directories() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("report.pdf");
        fs::write(&source, "pdf bytes").unwrap();
        let destination = temp.path().join("Documents").join("report.pdf");

        let report = execute(&[record(
            source.clone(),
            destination.clone(),
            Category::Documents,
        )]);

        assert!(report.is_complete_success());
        assert_eq!(report.moves.len(), 1);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "pdf bytes");
    }

    #[test]
    fn test_execute_skips_missing_source_and_continues() {
        let temp = TempDir::new().unwrap();
        let ghost = temp.path().join("ghost.txt");
        let real = temp.path().join("real.txt");
        fs::write(&real, "still here").unwrap();

        let report = execute(&[
            record(
                ghost.clone(),
                temp.path().join("Documents").join("ghost.txt"),
                Category::Documents,
            ),
            record(
                real.clone(),
                temp.path().join("Documents").join("real.txt"),
                Category::Documents,
            ),
        ]);

        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.not_moved.len(), 1);
        assert!(matches!(report.not_moved[0].1, SkipReason::SourceMissing));
        assert_eq!(report.moves[0].source_path, real);
    }

    #[test]
    fn test_execute_noop_succeeds_without_moving() {
        let temp = TempDir::new().unwrap();
        let docs = temp.path().join("Documents");
        fs::create_dir(&docs).unwrap();
        let placed = docs.join("report.pdf");
        fs::write(&placed, "already placed").unwrap();

        let report = execute(&[record(placed.clone(), placed.clone(), Category::Documents)]);

        assert!(report.is_complete_success());
        assert_eq!(report.moves.len(), 1);
        assert!(report.moves[0].is_noop());
        assert_eq!(fs::read_to_string(&placed).unwrap(), "already placed");
    }

    #[test]
    fn test_execute_reresolves_destination_race() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("report.pdf");
        fs::write(&source, "mine").unwrap();

        // Simulate a file racing into the planned destination after
        // planning.
        let docs = temp.path().join("Documents");
        fs::create_dir(&docs).unwrap();
        let occupied = docs.join("report.pdf");
        fs::write(&occupied, "someone else's").unwrap();

        let report = execute(&[record(source, occupied.clone(), Category::Documents)]);

        assert!(report.is_complete_success());
        assert_eq!(fs::read_to_string(&occupied).unwrap(), "someone else's");
        let resolved = &report.moves[0].destination_path;
        assert_eq!(resolved, &docs.join("report (1).pdf"));
        assert_eq!(fs::read_to_string(resolved).unwrap(), "mine");
    }

    #[test]
    fn test_execute_log_preserves_order() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let docs = temp.path().join("Documents");

        let report = execute(&[
            record(a.clone(), docs.join("a.txt"), Category::Documents),
            record(b.clone(), docs.join("b.txt"), Category::Documents),
        ]);

        assert_eq!(report.moves.len(), 2);
        assert_eq!(report.moves[0].source_path, a);
        assert_eq!(report.moves[1].source_path, b);
    }

    #[test]
    fn test_observer_sees_every_item() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, "a").unwrap();
        let ghost = temp.path().join("ghost.txt");
        let docs = temp.path().join("Documents");

        let mut seen = 0;
        execute_with(
            &[
                record(a, docs.join("a.txt"), Category::Documents),
                record(ghost, docs.join("ghost.txt"), Category::Documents),
            ],
            |_| seen += 1,
        );
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_copy_then_delete_verifies_and_removes_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("clip.mp4");
        fs::write(&source, b"four kilobytes of video".repeat(64)).unwrap();
        let expected = fs::read(&source).unwrap();
        let destination = temp.path().join("moved.mp4");

        copy_then_delete(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read(&destination).unwrap(), expected);
    }

    #[test]
    fn test_copy_then_delete_keeps_source_when_copy_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("clip.mp4");
        fs::write(&source, "video bytes").unwrap();
        // Destination directory does not exist, so the copy cannot
        // start.
        let destination = temp.path().join("missing").join("clip.mp4");

        let result = copy_then_delete(&source, &destination);

        assert!(matches!(result, Err(SkipReason::MoveFailed(_))));
        assert_eq!(fs::read_to_string(&source).unwrap(), "video bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_then_delete_reports_undeletable_source_without_losing_data() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("locked");
        fs::create_dir(&source_dir).unwrap();
        let source = source_dir.join("clip.mp4");
        fs::write(&source, "video bytes").unwrap();
        let destination = temp.path().join("clip.mp4");

        // Read-only parent: the copy can read the source but the
        // delete of the original must fail.
        fs::set_permissions(&source_dir, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind root; nothing to observe there.
        if fs::write(source_dir.join("probe"), b"").is_ok() {
            fs::set_permissions(&source_dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = copy_then_delete(&source, &destination);
        fs::set_permissions(&source_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(SkipReason::SourceRemovalFailed(_))));
        // Both copies intact; nothing was lost.
        assert_eq!(fs::read_to_string(&source).unwrap(), "video bytes");
        assert_eq!(fs::read_to_string(&destination).unwrap(), "video bytes");
    }

    #[test]
    fn test_message_counts_moved_and_not_moved() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        fs::write(&a, "a").unwrap();
        let ghost = temp.path().join("ghost.txt");
        let docs = temp.path().join("Documents");

        let report = execute(&[
            record(a, docs.join("a.txt"), Category::Documents),
            record(ghost, docs.join("ghost.txt"), Category::Documents),
        ]);

        let message = report.message();
        assert!(message.contains("1 of 2"), "unexpected message: {message}");
        assert!(message.contains("1 not moved"), "unexpected message: {message}");
    }
}
