//! Run configuration loaded from TOML.
//!
//! A config file can tune two independent things: which files the organizer
//! is allowed to touch (the `[filters]` section) and where extensions map to
//! (the `[[categories]]` tables plus `default_category`). Everything is
//! optional; an empty file behaves exactly like no file at all.
//!
//! ```toml
//! default_category = "Unsorted"
//!
//! [filters]
//! organize_hidden = false
//!
//! [filters.exclude]
//! names = ["Thumbs.db", "desktop.ini"]
//! patterns = ["*.part", "draft-*"]
//! extensions = [".tmp", ".lock"]
//! regexes = ["^~\\$"]
//!
//! [filters.include]
//! patterns = ["*.important"]
//!
//! [[categories]]
//! name = "Photos"
//!
//! [[categories.sub]]
//! name = "Raw"
//! extensions = [".raw", ".cr2"]
//! ```
//!
//! Lookup order: an explicit `--config` path, then `./.sorteryrc.toml`,
//! then `$HOME/.config/sortery/config.toml`, then built-in defaults.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::file_category::{CategoryTable, DEFAULT_CATEGORY};

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = ".sorteryrc.toml";

/// Errors raised while loading or compiling a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested config file does not exist.
    NotFound(PathBuf),
    /// The file exists but could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the schema.
    Invalid(String),
    /// A glob in `patterns` failed to compile.
    BadGlobPattern(String),
    /// A regex in `regexes` failed to compile.
    BadRegexPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The regex engine's explanation.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "configuration file not found: {}", path.display())
            }
            ConfigError::Io { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {reason}"),
            ConfigError::BadGlobPattern(pattern) => {
                write!(f, "invalid glob pattern '{pattern}'")
            }
            ConfigError::BadRegexPattern { pattern, reason } => {
                write!(f, "invalid regex pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Root of the TOML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Replaces the fallback category name when set.
    #[serde(default)]
    pub default_category: Option<String>,

    #[serde(default)]
    pub filters: FilterRules,

    /// When non-empty, replaces the built-in category table entirely.
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
}

/// Which files a run is allowed to touch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Also organize dotfiles. Off by default since hidden files tend to be
    /// per-directory state rather than stray downloads.
    #[serde(default)]
    pub organize_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist rules that override every exclusion.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for leaving files in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames (e.g. "Thumbs.db").
    #[serde(default)]
    pub names: Vec<String>,

    /// Glob patterns matched against the filename (e.g. "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, with or without the leading dot, matched case-insensitively.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regular expressions matched against the filename.
    #[serde(default)]
    pub regexes: Vec<String>,
}

/// Whitelist rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns matched against the filename.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// One `[[categories]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    #[serde(default)]
    pub sub: Vec<SubCategorySpec>,
}

/// One `[[categories.sub]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategorySpec {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Config {
    /// Loads configuration following the lookup order in the module docs.
    ///
    /// # Errors
    ///
    /// An explicitly requested file that is missing or malformed is an
    /// error; the fallback locations are probed silently.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let user_config = PathBuf::from(home)
                .join(".config")
                .join("sortery")
                .join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Loads and parses one specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read, and
    /// [`ConfigError::Invalid`] if it does not parse against the schema.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Compiles the filter rules into their matchable form.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern fails to compile.
    pub fn compile_filters(&self) -> Result<FileFilter, ConfigError> {
        FileFilter::new(&self.filters)
    }

    /// Builds the category table this run classifies against.
    ///
    /// Declaring any `[[categories]]` table replaces the built-in set
    /// wholesale rather than merging, so a config always describes the
    /// complete layout it produces. `default_category` applies either way.
    pub fn category_table(&self) -> CategoryTable {
        let mut table = if self.categories.is_empty() {
            CategoryTable::new()
        } else {
            let mut custom = CategoryTable::empty(DEFAULT_CATEGORY);
            for category in &self.categories {
                for sub in &category.sub {
                    let extensions: Vec<String> = sub
                        .extensions
                        .iter()
                        .map(|ext| normalize_extension(ext))
                        .collect();
                    let refs: Vec<&str> = extensions.iter().map(String::as_str).collect();
                    custom.add_mapping(&category.name, &sub.name, &refs);
                }
            }
            custom
        };
        if let Some(name) = &self.default_category {
            table.set_default_category(name);
        }
        table
    }
}

/// Guarantees the leading dot; lowercasing happens in the table itself.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Filter rules compiled into matchable form.
///
/// Globs and regexes are parsed once here so the per-entry check inside the
/// walk loop only does set lookups and pre-built matches.
pub struct FileFilter {
    organize_hidden: bool,
    excluded_names: HashSet<String>,
    /// Stored lowercase without the leading dot.
    excluded_extensions: HashSet<String>,
    exclude_globs: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_globs: Vec<Pattern>,
}

impl FileFilter {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_globs = compile_globs(&rules.exclude.patterns)?;
        let include_globs = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regexes
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::BadRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            organize_hidden: rules.organize_hidden,
            excluded_names: rules.exclude.names.iter().cloned().collect(),
            excluded_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_globs,
            exclude_regexes,
            include_globs,
        })
    }

    /// Decides whether the organizer may touch this entry.
    ///
    /// Checks run in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always organize
    /// 2. Hidden file rule - if hidden and not opted in, leave alone
    /// 3. Exact filename match - if matched, leave alone
    /// 4. Extension match - if matched, leave alone
    /// 5. Glob pattern match - if matched, leave alone
    /// 6. Regex pattern match - if matched, leave alone
    /// 7. Default: organize
    pub fn should_organize(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.include_globs.iter().any(|pattern| pattern.matches(&name)) {
            return true;
        }

        if !self.organize_hidden && name.starts_with('.') {
            return false;
        }

        if self.excluded_names.contains(name.as_ref()) {
            return false;
        }

        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if self.excluded_extensions.contains(&ext) {
                return false;
            }
        }

        if self.exclude_globs.iter().any(|pattern| pattern.matches(&name)) {
            return false;
        }

        if self.exclude_regexes.iter().any(|regex| regex.is_match(&name)) {
            return false;
        }

        true
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::BadGlobPattern(pattern.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_from_toml(doc: &str) -> FileFilter {
        let config: Config = toml::from_str(doc).expect("valid test config");
        config.compile_filters().expect("compilable test filters")
    }

    #[test]
    fn default_config_organizes_ordinary_files() {
        let filter = Config::default().compile_filters().unwrap();
        assert!(filter.should_organize(Path::new("report.pdf")));
        assert!(filter.should_organize(Path::new("song.mp3")));
    }

    #[test]
    fn hidden_files_are_left_alone_by_default() {
        let filter = Config::default().compile_filters().unwrap();
        assert!(!filter.should_organize(Path::new(".bashrc")));
        assert!(!filter.should_organize(Path::new(".hidden.txt")));
    }

    #[test]
    fn organize_hidden_opts_dotfiles_in() {
        let filter = filter_from_toml(
            r#"
            [filters]
            organize_hidden = true
            "#,
        );
        assert!(filter.should_organize(Path::new(".hidden.txt")));
    }

    #[test]
    fn excluded_names_match_exactly() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            names = ["Thumbs.db"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("Thumbs.db")));
        assert!(filter.should_organize(Path::new("thumbs.db")));
    }

    #[test]
    fn excluded_extensions_ignore_case_and_dot() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            extensions = [".tmp", "LOCK"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("download.TMP")));
        assert!(!filter.should_organize(Path::new("cargo.lock")));
        assert!(filter.should_organize(Path::new("notes.txt")));
    }

    #[test]
    fn exclude_globs_match_against_the_filename() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            patterns = ["draft-*", "*.part"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("draft-chapter1.docx")));
        assert!(!filter.should_organize(Path::new("movie.mkv.part")));
        assert!(filter.should_organize(Path::new("chapter1.docx")));
    }

    #[test]
    fn exclude_globs_see_the_filename_even_for_full_paths() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            patterns = ["*.part"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("/home/user/Downloads/movie.part")));
    }

    #[test]
    fn exclude_regexes_match_against_the_filename() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            regexes = ["^~\\$"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("~$budget.xlsx")));
        assert!(filter.should_organize(Path::new("budget.xlsx")));
    }

    #[test]
    fn include_patterns_override_exclusions() {
        let filter = filter_from_toml(
            r#"
            [filters.exclude]
            extensions = [".tmp"]

            [filters.include]
            patterns = ["keep-*"]
            "#,
        );
        assert!(!filter.should_organize(Path::new("scratch.tmp")));
        assert!(filter.should_organize(Path::new("keep-scratch.tmp")));
    }

    #[test]
    fn include_patterns_override_the_hidden_rule() {
        let filter = filter_from_toml(
            r#"
            [filters.include]
            patterns = [".env*"]
            "#,
        );
        assert!(filter.should_organize(Path::new(".env.backup")));
        assert!(!filter.should_organize(Path::new(".bashrc")));
    }

    #[test]
    fn bad_glob_is_reported() {
        let config: Config = toml::from_str(
            r#"
            [filters.exclude]
            patterns = ["[unclosed"]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::BadGlobPattern(_))
        ));
    }

    #[test]
    fn bad_regex_is_reported() {
        let config: Config = toml::from_str(
            r#"
            [filters.exclude]
            regexes = ["("]
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::BadRegexPattern { .. })
        ));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/sortery.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn category_table_defaults_to_the_builtin_set() {
        let table = Config::default().category_table();
        let classification = table.classify(".jpg");
        assert_eq!(classification.main, "Images");
        assert_eq!(classification.sub, Some("JPG"));
    }

    #[test]
    fn default_category_overrides_the_builtin_fallback() {
        let config: Config = toml::from_str(r#"default_category = "Unsorted""#).unwrap();
        let table = config.category_table();
        assert_eq!(table.classify(".xyz").main, "Unsorted");
        assert_eq!(table.classify(".jpg").main, "Images");
    }

    #[test]
    fn custom_categories_replace_the_builtin_set() {
        let config: Config = toml::from_str(
            r#"
            [[categories]]
            name = "Photos"

            [[categories.sub]]
            name = "Raw"
            extensions = ["cr2", ".NEF"]
            "#,
        )
        .unwrap();
        let table = config.category_table();

        // Dotless and upper-case extensions normalize on the way in.
        let classification = table.classify(".CR2");
        assert_eq!(classification.main, "Photos");
        assert_eq!(classification.sub, Some("Raw"));
        assert_eq!(table.classify(".nef").main, "Photos");

        // The built-in table is replaced, not merged.
        assert_eq!(table.classify(".jpg").main, "Miscellaneous");
        assert!(!table.is_category_dir("Images"));
    }

    #[test]
    fn custom_categories_keep_declaration_order() {
        let config: Config = toml::from_str(
            r#"
            [[categories]]
            name = "First"
            [[categories.sub]]
            name = "A"
            extensions = [".dat"]

            [[categories]]
            name = "Second"
            [[categories.sub]]
            name = "B"
            extensions = [".dat"]
            "#,
        )
        .unwrap();
        let table = config.category_table();
        assert_eq!(table.classify(".dat").main, "First");
    }
}
