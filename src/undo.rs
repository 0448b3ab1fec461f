//! Reversal of an executed move log.
//!
//! Undo consumes the log returned by the executor and replays it
//! backwards: the last move performed is the first one reversed, since
//! later moves may have renamed around earlier ones. Each reversal
//! checks its preconditions before touching the filesystem, so a
//! partially stale log (files deleted or re-created by the user in the
//! meantime) degrades to per-item failures instead of corrupting
//! anything. Emptied category directories are left in place; removing
//! them is not this engine's job.

use crate::executor::relocate;
use crate::planner::MoveRecord;
use std::path::PathBuf;

/// The outcome of reversing one move log.
#[derive(Debug)]
pub struct UndoReport {
    /// Number of moves successfully reversed, no-ops included.
    pub restored: usize,
    /// Entries that could not be reversed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Number of log entries processed.
    pub total: usize,
}

impl UndoReport {
    /// True when every log entry reversed cleanly.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Human-readable summary, one line per failed entry.
    pub fn message(&self) -> String {
        let mut summary = format!("Reversed {} of {} moves", self.restored, self.total);
        if self.failed.is_empty() {
            summary.push('.');
            return summary;
        }
        summary.push_str(&format!(" ({} failed):", self.failed.len()));
        for (path, reason) in &self.failed {
            summary.push_str(&format!("\n  - {}: {}", path.display(), reason));
        }
        summary
    }
}

/// Reverses `moves` in the opposite order they were applied.
///
/// For each entry the file at `destination_path` is moved back to
/// `source_path` with the same atomic-or-copy discipline the executor
/// uses. A missing destination or an occupied source fails that entry
/// and processing continues. Calling undo twice on the same log is
/// safe: the second pass finds nothing left to reverse and reports
/// those entries as failed without mutating anything.
pub fn undo(moves: &[MoveRecord]) -> UndoReport {
    let mut report = UndoReport {
        restored: 0,
        failed: Vec::new(),
        total: moves.len(),
    };

    for entry in moves.iter().rev() {
        if entry.is_noop() {
            // Nothing was moved, so there is nothing to move back.
            report.restored += 1;
            continue;
        }

        if !entry.destination_path.exists() {
            report.failed.push((
                entry.destination_path.clone(),
                "no longer exists at its organized location".to_string(),
            ));
            continue;
        }

        if entry.source_path.exists() {
            report.failed.push((
                entry.source_path.clone(),
                "original location is occupied by another file".to_string(),
            ));
            continue;
        }

        match relocate(&entry.destination_path, &entry.source_path) {
            Ok(()) => report.restored += 1,
            Err(reason) => report
                .failed
                .push((entry.destination_path.clone(), reason.to_string())),
        }
    }

    report
}
