//! Boundary operations exposed to the presentation layer.
//!
//! Every call here is stateless request/response: inputs and outputs
//! are plain serializable records, and the only state that crosses
//! calls is the move log the caller explicitly threads back in for
//! undo. Any shell (CLI, RPC, in-process UI) can sit on top of these
//! three operations.

use crate::executor;
use crate::planner::{self, MoveRecord, OrganizationPlan, PlanResult};
use crate::scanner::{self, FolderAnalysis, ScanResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What an organize run returned: a summary for display and the move
/// log needed to reverse it.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrganizeOutcome {
    /// Human-readable summary of moved vs. skipped files.
    pub message: String,
    /// Every successful move in execution order; the input to
    /// [`undo_organize`].
    pub moves: Vec<MoveRecord>,
}

/// Scans `folder_path` and classifies its top-level files.
///
/// Read-only; see [`scanner::analyze`].
pub fn analyze_folder(folder_path: &Path) -> ScanResult<FolderAnalysis> {
    scanner::analyze(folder_path)
}

/// Plans and executes an organization in one call.
///
/// Fails fast (before any mutation) on an invalid target root;
/// per-file problems during execution are reported in the returned
/// message instead of aborting the batch.
pub fn organize_files(plan: &OrganizationPlan) -> PlanResult<OrganizeOutcome> {
    let moves = planner::plan(plan)?;
    let report = executor::execute(&moves);
    Ok(OrganizeOutcome {
        message: report.message(),
        moves: report.moves,
    })
}

/// Reverses a previously executed move log and reports the result.
pub fn undo_organize(moves: &[MoveRecord]) -> String {
    crate::undo::undo(moves).message()
}
