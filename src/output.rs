//! Output formatting and styling for the CLI shell.
//!
//! Centralizes all terminal output: colored status messages, the
//! per-category summary table, and the progress bar ticked while a
//! batch executes. The engine itself never prints; everything the user
//! sees goes through here.

use crate::category::Category;
use crate::scanner::FolderAnalysis;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice in yellow.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar sized for one execution batch.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the per-category file counts of an analysis.
    ///
    /// Categories are listed in their fixed order; empty ones are
    /// omitted.
    pub fn summary_table(analysis: &FolderAnalysis) {
        Self::header("SUMMARY");

        let rows: Vec<(&'static str, usize)> = Category::ALL
            .iter()
            .filter_map(|category| {
                let count = analysis.files_in(*category).len();
                (count > 0).then(|| (category.dir_name(), count))
            })
            .collect();

        let width = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (name, count) in &rows {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                name,
                count.to_string().green(),
                file_word,
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            analysis.total_files.to_string().green().bold(),
            if analysis.total_files == 1 { "file" } else { "files" },
            width = width
        );
    }
}
