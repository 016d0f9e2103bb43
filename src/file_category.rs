//! Extension-based file classification.
//!
//! This module maps file extensions to a two-level destination: a main
//! category and a sub-category (e.g. `.jpg` → `Images/JPG`). The table is
//! built once at startup, from the built-in data set or from configuration,
//! and is treated as read-only afterwards.
//!
//! Extension keys include the leading dot and are stored lower-cased;
//! queries are lower-cased before lookup, so `classify(".JPG")` and
//! `classify(".jpg")` agree.
//!
//! # Examples
//!
//! ```
//! use sortery::file_category::{CategoryTable, DEFAULT_CATEGORY};
//!
//! let table = CategoryTable::new();
//!
//! let hit = table.classify(".jpg");
//! assert_eq!(hit.main, "Images");
//! assert_eq!(hit.sub, Some("JPG"));
//!
//! let miss = table.classify(".xyz");
//! assert_eq!(miss.main, DEFAULT_CATEGORY);
//! assert_eq!(miss.sub, None);
//! ```

use std::path::{Path, PathBuf};

/// Fallback main category for extensions the table does not know.
/// It has no sub-categories.
pub const DEFAULT_CATEGORY: &str = "Miscellaneous";

/// Where a file of a given extension belongs.
///
/// Borrowed from the [`CategoryTable`] that produced it. `sub` is `None`
/// only for the default bucket, which has no second level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Top-level destination folder name (e.g. `"Images"`).
    pub main: &'a str,
    /// Second-level destination folder name (e.g. `"JPG"`), if any.
    pub sub: Option<&'a str>,
}

impl Classification<'_> {
    /// Destination directory for this classification under `base_dir`.
    pub fn destination_dir(&self, base_dir: &Path) -> PathBuf {
        let mut dir = base_dir.join(self.main);
        if let Some(sub) = self.sub {
            dir.push(sub);
        }
        dir
    }

    /// Human-readable `Main` or `Main/Sub` form, used in log messages.
    pub fn label(&self) -> String {
        match self.sub {
            Some(sub) => format!("{}/{}", self.main, sub),
            None => self.main.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct SubCategory {
    name: String,
    extensions: Vec<String>,
}

#[derive(Debug, Clone)]
struct CategoryGroup {
    name: String,
    subs: Vec<SubCategory>,
}

/// Ordered mapping from file extension to (main category, sub-category).
///
/// Lookup walks the table in declaration order and returns the first
/// matching entry, so an extension listed under two categories resolves to
/// whichever was declared first. Custom tables rely on that ordering.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    groups: Vec<CategoryGroup>,
    default_category: String,
}

impl CategoryTable {
    /// Creates a table with the standard built-in mappings.
    pub fn new() -> Self {
        let mut table = Self::empty(DEFAULT_CATEGORY);
        table.populate_standard_mappings();
        table
    }

    /// Creates a table with no mappings and the given default category.
    ///
    /// Used when the table is built from configuration instead of the
    /// built-in data set.
    pub fn empty(default_category: impl Into<String>) -> Self {
        Self {
            groups: Vec::new(),
            default_category: default_category.into(),
        }
    }

    /// Populates the table with the standard category data set.
    fn populate_standard_mappings(&mut self) {
        self.add_mapping("Images", "JPG", &[".jpg", ".jpeg"]);
        self.add_mapping("Images", "PNG", &[".png"]);
        self.add_mapping("Images", "GIF", &[".gif"]);
        self.add_mapping("Images", "Vector", &[".svg"]);
        self.add_mapping("Images", "Other", &[".bmp", ".tiff"]);

        self.add_mapping("Documents", "PDFs", &[".pdf"]);
        self.add_mapping("Documents", "Word", &[".docx", ".doc"]);
        self.add_mapping("Documents", "PowerPoint", &[".pptx", ".ppt"]);
        self.add_mapping("Documents", "Excel", &[".xlsx", ".xls"]);
        self.add_mapping("Documents", "Text", &[".txt", ".odt", ".rtf"]);

        self.add_mapping("Audio", "MP3", &[".mp3"]);
        self.add_mapping("Audio", "Lossless", &[".flac"]);
        self.add_mapping("Audio", "Other", &[".wav", ".aac", ".m4a"]);

        self.add_mapping("Video", "MP4", &[".mp4"]);
        self.add_mapping("Video", "AVI", &[".avi"]);
        self.add_mapping("Video", "Other", &[".mov", ".mkv", ".wmv"]);

        self.add_mapping("Archives", "ZIP", &[".zip"]);
        self.add_mapping("Archives", "RAR", &[".rar"]);
        self.add_mapping("Archives", "Other", &[".tar", ".gz", ".7z"]);

        self.add_mapping("Code", "Python", &[".py"]);
        self.add_mapping("Code", "Web", &[".js", ".html", ".css"]);
        self.add_mapping("Code", "C_and_C++", &[".c", ".cpp", ".h"]);
        self.add_mapping("Code", "Other", &[".java", ".json", ".xml"]);

        self.add_mapping("Executables", "Windows", &[".exe", ".msi"]);
    }

    /// Adds extensions under `main`/`sub`, creating the groups on first use.
    ///
    /// Groups keep the order of their first `add_mapping` call; extensions
    /// are stored lower-cased and must include the leading dot (`".jpg"`).
    pub fn add_mapping(&mut self, main: &str, sub: &str, extensions: &[&str]) {
        let group_index = match self.groups.iter().position(|g| g.name == main) {
            Some(index) => index,
            None => {
                self.groups.push(CategoryGroup {
                    name: main.to_string(),
                    subs: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let group = &mut self.groups[group_index];

        let sub_index = match group.subs.iter().position(|s| s.name == sub) {
            Some(index) => index,
            None => {
                group.subs.push(SubCategory {
                    name: sub.to_string(),
                    extensions: Vec::new(),
                });
                group.subs.len() - 1
            }
        };

        group.subs[sub_index]
            .extensions
            .extend(extensions.iter().map(|ext| ext.to_lowercase()));
    }

    /// Changes the fallback category name returned for unknown extensions.
    pub fn set_default_category(&mut self, name: impl Into<String>) {
        self.default_category = name.into();
    }

    /// Resolves an extension to its destination category pair.
    ///
    /// The query is lower-cased, then the table is walked in declaration
    /// order; the first sub-category listing the extension wins. Unknown
    /// or empty extensions classify into the default category with no
    /// sub-category, so there is no failure mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortery::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::new();
    /// assert_eq!(table.classify(".FLAC").label(), "Audio/Lossless");
    /// assert_eq!(table.classify("").label(), "Miscellaneous");
    /// ```
    pub fn classify(&self, extension: &str) -> Classification<'_> {
        let query = extension.to_lowercase();
        for (main, sub, extensions) in self.iter() {
            if extensions.iter().any(|ext| *ext == query) {
                return Classification {
                    main,
                    sub: Some(sub),
                };
            }
        }
        Classification {
            main: &self.default_category,
            sub: None,
        }
    }

    /// Ordered traversal of `(main, sub, extensions)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.groups.iter().flat_map(|group| {
            group.subs.iter().map(move |sub| {
                (
                    group.name.as_str(),
                    sub.name.as_str(),
                    sub.extensions.as_slice(),
                )
            })
        })
    }

    /// Names of the main categories, in declaration order.
    pub fn main_category_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    /// The fallback category name for unknown extensions.
    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Whether `name` is a folder this tool itself creates: a main
    /// category or the default category. The directory walker uses this to
    /// leave previously created category folders alone.
    pub fn is_category_dir(&self, name: &str) -> bool {
        name == self.default_category || self.groups.iter().any(|g| g.name == name)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_extensions() {
        let table = CategoryTable::new();

        let jpg = table.classify(".jpg");
        assert_eq!((jpg.main, jpg.sub), ("Images", Some("JPG")));

        let pdf = table.classify(".pdf");
        assert_eq!((pdf.main, pdf.sub), ("Documents", Some("PDFs")));

        let flac = table.classify(".flac");
        assert_eq!((flac.main, flac.sub), ("Audio", Some("Lossless")));

        let exe = table.classify(".exe");
        assert_eq!((exe.main, exe.sub), ("Executables", Some("Windows")));
    }

    #[test]
    fn classify_is_case_insensitive_for_every_table_entry() {
        let table = CategoryTable::new();
        let entries: Vec<(String, String, Vec<String>)> = table
            .iter()
            .map(|(main, sub, exts)| (main.to_string(), sub.to_string(), exts.to_vec()))
            .collect();

        for (main, sub, extensions) in entries {
            for ext in extensions {
                let lower = table.classify(&ext);
                let upper = table.classify(&ext.to_uppercase());
                assert_eq!(lower, upper, "case mismatch for {}", ext);
                assert_eq!(lower.main, main);
                assert_eq!(lower.sub.unwrap(), sub);
            }
        }
    }

    #[test]
    fn classify_unknown_extension_falls_back_to_default() {
        let table = CategoryTable::new();
        let hit = table.classify(".xyz");
        assert_eq!(hit.main, DEFAULT_CATEGORY);
        assert_eq!(hit.sub, None);
    }

    #[test]
    fn classify_empty_extension_falls_back_to_default() {
        let table = CategoryTable::new();
        let hit = table.classify("");
        assert_eq!(hit.main, DEFAULT_CATEGORY);
        assert_eq!(hit.sub, None);
    }

    #[test]
    fn first_declared_category_wins_on_duplicate_extension() {
        let mut table = CategoryTable::empty("Other");
        table.add_mapping("Scans", "Raw", &[".img"]);
        table.add_mapping("Backups", "Disk", &[".img"]);

        let hit = table.classify(".img");
        assert_eq!((hit.main, hit.sub), ("Scans", Some("Raw")));
    }

    #[test]
    fn add_mapping_extends_existing_sub_category() {
        let mut table = CategoryTable::empty("Other");
        table.add_mapping("Images", "JPG", &[".jpg"]);
        table.add_mapping("Images", "JPG", &[".jpeg"]);

        assert_eq!(table.classify(".jpeg").label(), "Images/JPG");
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn iter_preserves_declaration_order() {
        let table = CategoryTable::new();
        let firsts: Vec<&str> = table.iter().take(3).map(|(_, sub, _)| sub).collect();
        assert_eq!(firsts, ["JPG", "PNG", "GIF"]);

        let mains: Vec<&str> = table.main_category_names().collect();
        assert_eq!(
            mains,
            [
                "Images",
                "Documents",
                "Audio",
                "Video",
                "Archives",
                "Code",
                "Executables"
            ]
        );
    }

    #[test]
    fn is_category_dir_covers_mains_and_default() {
        let table = CategoryTable::new();
        assert!(table.is_category_dir("Images"));
        assert!(table.is_category_dir("Executables"));
        assert!(table.is_category_dir(DEFAULT_CATEGORY));
        assert!(!table.is_category_dir("Downloads"));
        assert!(!table.is_category_dir("JPG"));
    }

    #[test]
    fn custom_default_category() {
        let mut table = CategoryTable::empty("Unsorted");
        table.add_mapping("Images", "JPG", &[".jpg"]);

        assert_eq!(table.classify(".zzz").main, "Unsorted");
        assert!(table.is_category_dir("Unsorted"));
        assert_eq!(table.default_category(), "Unsorted");
    }

    #[test]
    fn destination_dir_includes_sub_when_present() {
        let table = CategoryTable::new();
        let base = Path::new("/tmp/drop");

        let with_sub = table.classify(".mp4").destination_dir(base);
        assert_eq!(with_sub, PathBuf::from("/tmp/drop/Video/MP4"));

        let without_sub = table.classify(".xyz").destination_dir(base);
        assert_eq!(without_sub, PathBuf::from("/tmp/drop/Miscellaneous"));
    }
}
