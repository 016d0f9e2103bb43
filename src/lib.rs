//! sortery - sort a directory's files into category folders by extension
//!
//! This library classifies files by their extension into a two-level
//! category layout (for example `Images/JPG/`), moves them there without
//! ever overwriting anything, and keeps a log of what went where. Filtering
//! rules and custom category tables come from TOML configuration files.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{Config, ConfigError, FileFilter};
pub use file_category::{CategoryTable, Classification, DEFAULT_CATEGORY};
pub use file_organizer::{FileEntry, FileOrganizer, PlaceError, PlacementOutcome, SkipReason};

pub use cli::{Cli, RunSummary, run, run_with_config};
