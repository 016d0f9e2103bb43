//! File placement: classification, conflict resolution and the move itself.
//!
//! [`FileOrganizer::place`] takes one candidate entry and produces exactly
//! one [`PlacementOutcome`]: the file was moved, the entry was skipped, or
//! the move failed. File-system errors never escape as `Err` or panics;
//! they are folded into the `Failed` outcome so a caller can keep
//! processing the rest of a directory.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::file_category::CategoryTable;

/// A candidate item found directly under the source directory.
///
/// Read from the file system once per run; the organizer never mutates it,
/// it only relocates the underlying file as a side effect of placement.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name decoded for display and log lines, e.g. `"photo.JPG"`.
    pub name: String,
    /// File name exactly as stored on disk. Destination paths are built
    /// from this, so a name that is not valid UTF-8 survives the move.
    pub file_name: OsString,
    /// Full path to the entry.
    pub path: PathBuf,
    /// Suffix including the leading dot and original casing (`".JPG"`),
    /// or empty when the name has no extension.
    pub extension: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl FileEntry {
    /// Builds an entry from a path, deriving name, extension and kind.
    ///
    /// Returns `None` for paths without a final name component (`/`, `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_os_string();
        let name = file_name.to_string_lossy().into_owned();
        let extension = match path.extension() {
            Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
            _ => String::new(),
        };
        Some(Self {
            name,
            file_name,
            path: path.to_path_buf(),
            extension,
            is_dir: path.is_dir(),
        })
    }
}

/// Why an entry was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a directory; only plain files are organized.
    IsDirectory,
    /// The file name carries no extension to classify by.
    NoExtension,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsDirectory => write!(f, "is a directory"),
            Self::NoExtension => write!(f, "no file extension"),
        }
    }
}

/// A file-system failure captured during placement.
///
/// Each variant keeps the underlying [`io::Error`] so callers can branch on
/// [`PlaceError::io_kind`] instead of parsing messages.
#[derive(Debug)]
pub enum PlaceError {
    /// The destination category directory could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// The move (rename or copy-and-delete) failed.
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl PlaceError {
    /// Kind of the underlying file-system error.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::DirectoryCreationFailed { source, .. } | Self::MoveFailed { source, .. } => {
                source.kind()
            }
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(f, "could not create directory {}: {}", path.display(), source)
            }
            Self::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "could not move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for PlaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreationFailed { source, .. } | Self::MoveFailed { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Terminal result of placing one entry. Exactly one is produced per
/// processed entry; it is aggregated and logged, never persisted.
#[derive(Debug)]
pub enum PlacementOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// The entry was not eligible and was left untouched.
    Skipped(SkipReason),
    /// The move was attempted (or prepared) and failed; the file stays put.
    Failed(PlaceError),
}

impl PlacementOutcome {
    /// Destination path when the outcome is `Moved`.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Moved(path) => Some(path),
            _ => None,
        }
    }
}

/// Moves files into their category directories under a base path.
///
/// Holds a reference to the [`CategoryTable`] built at startup; the
/// organizer itself carries no other state.
pub struct FileOrganizer<'a> {
    table: &'a CategoryTable,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    /// Returns a collision-free destination path.
    ///
    /// If `destination` is unoccupied it comes back unchanged. Otherwise a
    /// local timestamp (seconds resolution, `YYYYMMDDHHMMSS`) is inserted
    /// between the file stem and its extension:
    /// `photo.jpg` → `photo_20250614093012.jpg`.
    ///
    /// Resolution is single-pass: the synthesized path is not re-checked,
    /// so two collisions on the same name within the same clock second can
    /// yield the same path. The existence check here and the move that
    /// follows are not atomic either. Both are accepted limitations of the
    /// one-shot, single-directory design.
    pub fn resolve_conflict(destination: &Path) -> PathBuf {
        if !destination.exists() {
            return destination.to_path_buf();
        }

        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let mut renamed = destination
            .file_stem()
            .map(OsStr::to_os_string)
            .unwrap_or_default();
        renamed.push(format!("_{}", timestamp));
        if let Some(ext) = destination.extension() {
            renamed.push(".");
            renamed.push(ext);
        }
        destination.with_file_name(renamed)
    }

    /// Classifies `entry`, prepares its destination directory under
    /// `base_dir`, resolves name conflicts and moves the file.
    ///
    /// Directories and extensionless files are skipped (the latter with a
    /// warning in the log). The move is attempted at most once; any
    /// file-system failure is captured as [`PlacementOutcome::Failed`]
    /// together with an error log line. Successful moves log one info line
    /// naming the destination category.
    pub fn place(&self, entry: &FileEntry, base_dir: &Path) -> PlacementOutcome {
        if entry.is_dir {
            return PlacementOutcome::Skipped(SkipReason::IsDirectory);
        }
        if entry.extension.is_empty() {
            warn!("Skipping '{}' (no file extension).", entry.name);
            return PlacementOutcome::Skipped(SkipReason::NoExtension);
        }

        let classification = self.table.classify(&entry.extension);
        let destination_dir = classification.destination_dir(base_dir);
        if let Err(source) = fs::create_dir_all(&destination_dir) {
            let error = PlaceError::DirectoryCreationFailed {
                path: destination_dir,
                source,
            };
            error!("Failed to move '{}'. Reason: {}", entry.name, error);
            return PlacementOutcome::Failed(error);
        }

        let target = Self::resolve_conflict(&destination_dir.join(&entry.file_name));
        match move_file(&entry.path, &target) {
            Ok(()) => {
                info!("Moved '{}' to '{}/'", entry.name, classification.label());
                PlacementOutcome::Moved(target)
            }
            Err(source) => {
                let error = PlaceError::MoveFailed {
                    from: entry.path.clone(),
                    to: target,
                    source,
                };
                error!("Failed to move '{}'. Reason: {}", entry.name, error);
                PlacementOutcome::Failed(error)
            }
        }
    }
}

/// Renames `from` to `to`; when the destination is on another volume,
/// falls back to copy-then-delete. `fs::copy` carries content byte-for-byte
/// and permission bits, which is as much metadata as the platform promises.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
