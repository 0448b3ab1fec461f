//! Command-line shell for the organization engine.
//!
//! This is the presentation layer: it parses arguments, resolves paths,
//! threads the engine's boundary operations together, persists the
//! returned move log so `undo` can find it later, and renders results.
//! All the actual semantics live in the engine modules.

use crate::config::{CompiledFilters, FilterConfig};
use crate::executor;
use crate::history::HistoryFile;
use crate::output::OutputFormatter;
use crate::planner::{self, OrganizationPlan};
use crate::scanner;
use crate::undo;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Organize a folder's files into category subdirectories, and undo it.
#[derive(Debug, Parser)]
#[command(name = "tidydesk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan a folder and show how its files would be categorized.
    Analyze {
        /// The folder to scan.
        dir: PathBuf,
        /// Optional TOML filter configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Move a folder's files into category subdirectories.
    Organize {
        /// The folder to organize.
        dir: PathBuf,
        /// Organize into a different root than the scanned folder.
        #[arg(long)]
        into: Option<PathBuf>,
        /// Show the planned moves without performing them.
        #[arg(long)]
        dry_run: bool,
        /// Optional TOML filter configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Reverse the most recent organize run in a folder.
    Undo {
        /// The folder that was organized.
        dir: PathBuf,
    },
}

/// Dispatches a parsed command. Returns a displayable error string on
/// failure; the caller decides the exit code.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Analyze { dir, config } => {
            let dir = absolute(&dir)?;
            let filters = load_filters(config.as_deref())?;
            analyze_command(&dir, &filters)
        }
        Command::Organize {
            dir,
            into,
            dry_run,
            config,
        } => {
            let dir = absolute(&dir)?;
            let target = match into {
                Some(into) => absolute(&into)?,
                None => dir.clone(),
            };
            let filters = load_filters(config.as_deref())?;
            organize_command(&dir, &target, dry_run, &filters)
        }
        Command::Undo { dir } => {
            let dir = absolute(&dir)?;
            undo_command(&dir)
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    // Not canonicalize: the --into target may not exist yet (the
    // executor creates it lazily), and resolving symlinks would make
    // the logged paths diverge from what the user typed.
    std::path::absolute(path)
        .map_err(|e| format!("Cannot resolve path {}: {}", path.display(), e))
}

fn load_filters(config_path: Option<&Path>) -> Result<CompiledFilters, String> {
    let config = FilterConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))
}

fn analyze_command(dir: &Path, filters: &CompiledFilters) -> Result<(), String> {
    OutputFormatter::info(&format!("Analyzing: {}", dir.display()));

    let analysis = scanner::analyze_with_filters(dir, filters).map_err(|e| e.to_string())?;
    if analysis.total_files == 0 {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::summary_table(&analysis);
    Ok(())
}

fn organize_command(
    dir: &Path,
    target: &Path,
    dry_run: bool,
    filters: &CompiledFilters,
) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing: {}", dir.display()));

    let analysis = scanner::analyze_with_filters(dir, filters).map_err(|e| e.to_string())?;
    if analysis.total_files == 0 {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    let plan = OrganizationPlan::from_analysis(analysis, target.to_path_buf());
    let moves = planner::plan(&plan).map_err(|e| e.to_string())?;

    if dry_run {
        OutputFormatter::header("Planned moves:");
        for record in &moves {
            if record.is_noop() {
                OutputFormatter::plain(&format!(
                    " - {} (already in place)",
                    record.source_path.display()
                ));
            } else {
                OutputFormatter::plain(&format!(
                    " - {} -> {}",
                    record.source_path.display(),
                    record.destination_path.display()
                ));
            }
        }
        OutputFormatter::dry_run_notice(&format!(
            "{} files would be organized. No files were modified.",
            moves.len()
        ));
        return Ok(());
    }

    let bar = OutputFormatter::create_progress_bar(moves.len() as u64);
    let report = executor::execute_with(&moves, |_| bar.inc(1));
    bar.finish_and_clear();

    if !report.moves.is_empty() {
        let history = HistoryFile::new(dir.to_path_buf(), report.moves.clone());
        if let Err(e) = history.save() {
            OutputFormatter::warning(&format!(
                "Could not save history, undo will not be available: {}",
                e
            ));
        }
    }

    if report.is_complete_success() {
        OutputFormatter::success(&report.message());
        OutputFormatter::plain(&format!(
            "Run 'tidydesk undo {}' to revert.",
            dir.display()
        ));
    } else {
        OutputFormatter::warning(&report.message());
    }
    Ok(())
}

fn undo_command(dir: &Path) -> Result<(), String> {
    OutputFormatter::info("Undoing previous organization...");

    let history = HistoryFile::load(dir).map_err(|e| e.to_string())?;
    let report = undo::undo(&history.moves);

    if report.is_complete_success() {
        OutputFormatter::success(&report.message());
        if let Err(e) = HistoryFile::delete(dir) {
            OutputFormatter::warning(&format!("Could not delete history file: {}", e));
        }
    } else {
        OutputFormatter::warning(&report.message());
        OutputFormatter::plain("History file was kept; fix the issues and undo again.");
    }
    Ok(())
}
