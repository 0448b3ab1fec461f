//! tidydesk - folder analysis and organization engine
//!
//! Scans a folder, classifies its top-level files by extension, moves
//! them into category subdirectories without ever overwriting anything,
//! and can reverse a run exactly from the move log it returns.
//! Scanning, planning, execution, and undo are separate stages wired
//! together by the boundary operations in [`engine`].

pub mod category;
pub mod cli;
pub mod config;
pub mod engine;
pub mod executor;
pub mod history;
pub mod output;
pub mod planner;
pub mod scanner;
pub mod undo;

pub use category::Category;
pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use engine::{OrganizeOutcome, analyze_folder, organize_files, undo_organize};
pub use executor::{ExecutionReport, SkipReason};
pub use history::{HISTORY_FILE_NAME, HistoryFile};
pub use planner::{MoveRecord, OrganizationPlan, PlanError};
pub use scanner::{FileRecord, FolderAnalysis, ScanError};
pub use undo::UndoReport;

pub use cli::{Cli, run};
