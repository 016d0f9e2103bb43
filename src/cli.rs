//! Command-line interface and run orchestration.
//!
//! This module owns everything between argument parsing and the per-file
//! placement calls:
//! - Argument definitions (clap derive)
//! - Target directory validation
//! - Config loading and filter compilation
//! - The single-level directory walk
//! - Dry-run previews and the end-of-run summary

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::file_category::CategoryTable;
use crate::file_organizer::{FileEntry, FileOrganizer, PlacementOutcome};
use crate::logging::LOG_FILE_NAME;
use crate::output::OutputFormatter;

/// Sort a directory's files into category folders by extension.
#[derive(Parser, Debug)]
#[command(name = "sortery", version, about)]
pub struct Cli {
    /// Directory whose files should be organized.
    pub directory: PathBuf,

    /// Preview the moves without touching any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Config file to use instead of the default lookup locations.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What happened to the entries of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Files that landed in a category directory.
    pub moved: usize,
    /// Files whose move or directory creation failed.
    pub failed: usize,
    /// Entries left in place (directories, extensionless files).
    pub skipped: usize,
}

impl RunSummary {
    /// Tallies one placement outcome.
    pub fn record(&mut self, outcome: &PlacementOutcome) {
        match outcome {
            PlacementOutcome::Moved(_) => self.moved += 1,
            PlacementOutcome::Skipped(_) => self.skipped += 1,
            PlacementOutcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of entries the run looked at.
    pub fn total(&self) -> usize {
        self.moved + self.failed + self.skipped
    }
}

/// Runs one organization pass as described by the parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use sortery::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["sortery", "/home/user/Downloads"]);
/// match run(&cli) {
///     Ok(summary) => println!("{} files moved", summary.moved),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run(cli: &Cli) -> Result<RunSummary, String> {
    run_with_config(&cli.directory, cli.dry_run, cli.config.as_deref())
}

/// Runs one organization pass with an explicit config path.
///
/// Per-file problems never abort the pass; they are logged, counted in the
/// summary, and the walk continues. An `Err` here means the run could not
/// start at all: bad target directory, unreadable directory, or a config
/// that failed to load or compile.
pub fn run_with_config(
    dir: &Path,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<RunSummary, String> {
    if !dir.is_dir() {
        error!("Error: Path '{}' is not a valid directory.", dir.display());
        return Err(format!(
            "Path '{}' is not a valid directory.",
            dir.display()
        ));
    }

    let config =
        Config::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;
    let filter = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let table = config.category_table();

    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Error reading directory {}: {}", dir.display(), e))?;

    let mut to_place: Vec<FileEntry> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_entry) = FileEntry::from_path(&path) else {
            continue;
        };
        // The organizer's own artifacts stay put no matter what the filters say.
        if file_entry.name == LOG_FILE_NAME || file_entry.name == CONFIG_FILE_NAME {
            continue;
        }
        // Category directories from earlier runs are part of the layout, not input.
        if file_entry.is_dir && table.is_category_dir(&file_entry.name) {
            continue;
        }
        if !filter.should_organize(&path) {
            continue;
        }
        to_place.push(file_entry);
    }

    if dry_run {
        return Ok(preview(&table, &to_place));
    }

    info!("--- Starting organization for '{}' ---", dir.display());

    if to_place.is_empty() {
        OutputFormatter::info("No files found to organize.");
    }

    let organizer = FileOrganizer::new(&table);
    let mut summary = RunSummary::default();
    let mut destination_counts: HashMap<String, usize> = HashMap::new();

    let pb = OutputFormatter::create_progress_bar(to_place.len() as u64);
    for file_entry in &to_place {
        pb.set_message(file_entry.name.clone());
        let outcome = organizer.place(file_entry, dir);
        if matches!(outcome, PlacementOutcome::Moved(_)) {
            let label = table.classify(&file_entry.extension).label();
            *destination_counts.entry(label).or_insert(0) += 1;
        }
        summary.record(&outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("--- Organization Complete ---");
    info!(
        "Summary: {} files moved, {} failed, {} skipped.",
        summary.moved, summary.failed, summary.skipped
    );

    if !destination_counts.is_empty() {
        OutputFormatter::summary_table(&destination_counts, summary.moved);
    }

    Ok(summary)
}

/// Prints what a real run would do, without moving anything.
///
/// Returns a zeroed summary since nothing actually happened.
fn preview(table: &CategoryTable, entries: &[FileEntry]) -> RunSummary {
    if entries.is_empty() {
        OutputFormatter::info("No files found to organize.");
        return RunSummary::default();
    }

    OutputFormatter::dry_run_notice("Previewing only, no files will be moved.");

    let mut destination_counts: HashMap<String, usize> = HashMap::new();
    let mut would_skip = 0usize;

    for entry in entries {
        OutputFormatter::plain(&format!(" - {}", entry.name));
        if entry.is_dir {
            OutputFormatter::plain("   → Would be skipped (directory)");
            would_skip += 1;
        } else if entry.extension.is_empty() {
            OutputFormatter::plain("   → Would be skipped (no file extension)");
            would_skip += 1;
        } else {
            let label = table.classify(&entry.extension).label();
            OutputFormatter::plain(&format!("   → Would move to {}/", label));
            *destination_counts.entry(label).or_insert(0) += 1;
        }
    }

    let would_move: usize = destination_counts.values().sum();
    OutputFormatter::summary_table(&destination_counts, would_move);
    if would_skip > 0 {
        OutputFormatter::plain(&format!(
            "{} {} would be skipped.",
            would_skip,
            if would_skip == 1 { "entry" } else { "entries" }
        ));
    }
    OutputFormatter::success("Dry run complete. No files were modified.");

    RunSummary::default()
}
