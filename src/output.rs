//! Terminal output and styling.
//!
//! All user-facing console output goes through here so color, symbols, and
//! table layout stay consistent. The run log is separate (see the logging
//! module); these helpers are for what the user watches live.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Consistent styling for everything the CLI prints.
///
/// Provides:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for move batches
/// - A per-destination summary table
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortery::output::OutputFormatter;
    /// OutputFormatter::success("Directory organized.");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark to stderr.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortery::output::OutputFormatter;
    /// OutputFormatter::error("Could not move 'report.pdf'");
    /// ```
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

    /// Creates a progress bar sized to the number of entries in the walk.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortery::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(42);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
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

    /// Prints a table of how many files each destination received.
    ///
    /// # Arguments
    ///
    /// * `destination_counts` - Map of "Main/Sub" labels to moved-file counts
    /// * `total_moved` - Total number of files moved this run
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortery::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Images/JPG".to_string(), 8);
    /// counts.insert("Documents/PDFs".to_string(), 3);
    /// OutputFormatter::summary_table(&counts, 11);
    /// ```
    pub fn summary_table(destination_counts: &HashMap<String, usize>, total_moved: usize) {
        Self::header("SUMMARY");

        // Sort destinations for stable output
        let mut destinations: Vec<_> = destination_counts.iter().collect();
        destinations.sort_by_key(|&(label, _)| label);

        let max_label_len = destinations
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max(11); // At least "Destination" width

        println!(
            "{:<width$} | {}",
            "Destination".bold(),
            "Moved".bold(),
            width = max_label_len
        );
        println!("{}", "-".repeat(max_label_len + 10));

        for (label, count) in &destinations {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                label,
                count.to_string().green(),
                file_word,
                width = max_label_len
            );
        }

        println!("{}", "-".repeat(max_label_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_moved.to_string().green().bold(),
            if total_moved == 1 { "file" } else { "files" },
            width = max_label_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}
