//! Input options for the walk and blame phases.
//!
//! This module contains all configuration types that control which files
//! the walk accepts and how the attribution engine runs. Every option has a
//! defined default, so there is no error path for configuration itself.

use serde::{Deserialize, Serialize};

/// Name of the per-directory pattern file consulted during the walk.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Which optional content checks exclude files from the walk.
///
/// Each flag set to `true` enables one check, and the matching files are
/// left out of every count. Binary files are always excluded and have no
/// toggle here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionConfig {
    /// Exclude files whose name starts with a dot
    pub dot_files: bool,
    /// Exclude configuration files (JSON, YAML, TOML, XML, INI, ...)
    pub config_files: bool,
    /// Exclude generated files (lock files, minified bundles, codegen output)
    pub generated_files: bool,
    /// Exclude vendored files (vendor/, node_modules/, third_party/, ...)
    pub vendor_files: bool,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            dot_files: true,
            config_files: true,
            generated_files: true,
            vendor_files: true,
        }
    }
}

impl ExclusionConfig {
    /// Exclude everything the optional checks can detect (the default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable every optional check; only binary files are excluded.
    pub fn none() -> Self {
        Self {
            dot_files: false,
            config_files: false,
            generated_files: false,
            vendor_files: false,
        }
    }

    /// Set whether dot files are excluded.
    pub fn dot_files(mut self, exclude: bool) -> Self {
        self.dot_files = exclude;
        self
    }

    /// Set whether configuration files are excluded.
    pub fn config_files(mut self, exclude: bool) -> Self {
        self.config_files = exclude;
        self
    }

    /// Set whether generated files are excluded.
    pub fn generated_files(mut self, exclude: bool) -> Self {
        self.generated_files = exclude;
        self
    }

    /// Set whether vendored files are excluded.
    pub fn vendor_files(mut self, exclude: bool) -> Self {
        self.vendor_files = exclude;
        self
    }
}

/// Options for the directory walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Content exclusions applied to every regular file
    pub exclusions: ExclusionConfig,
    /// File name of the per-directory pattern file
    pub ignore_file: String,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            exclusions: ExclusionConfig::default(),
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
        }
    }
}

impl WalkOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content exclusions.
    pub fn exclusions(mut self, exclusions: ExclusionConfig) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Set the name of the per-directory pattern file.
    pub fn ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_file = name.into();
        self
    }
}

/// Options for the attribution engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlameOptions {
    /// Number of worker threads (`None` = half the logical CPUs, at least one)
    pub workers: Option<usize>,
}

impl BlameOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed number of workers. Zero is treated as one.
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = Some(count);
        self
    }

    /// Number of workers to spawn for `file_count` files.
    ///
    /// Never more workers than files, never fewer than one.
    pub fn worker_count(&self, file_count: usize) -> usize {
        let configured = self.workers.unwrap_or_else(|| num_cpus::get() / 2).max(1);
        configured.min(file_count.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusions_default_excludes_everything() {
        let config = ExclusionConfig::default();
        assert!(config.dot_files);
        assert!(config.config_files);
        assert!(config.generated_files);
        assert!(config.vendor_files);
    }

    #[test]
    fn test_exclusions_builder() {
        let config = ExclusionConfig::none().vendor_files(true);
        assert!(!config.dot_files);
        assert!(!config.config_files);
        assert!(!config.generated_files);
        assert!(config.vendor_files);
    }

    #[test]
    fn test_walk_options_defaults() {
        let options = WalkOptions::new();
        assert_eq!(options.ignore_file, ".gitignore");
        assert_eq!(options.exclusions, ExclusionConfig::default());
    }

    #[test]
    fn test_worker_count_bounds() {
        assert_eq!(BlameOptions::new().workers(0).worker_count(10), 1);
        assert_eq!(BlameOptions::new().workers(8).worker_count(3), 3);
        assert_eq!(BlameOptions::new().workers(8).worker_count(0), 1);
        assert_eq!(BlameOptions::new().workers(4).worker_count(100), 4);
        assert!(BlameOptions::new().worker_count(100) >= 1);
    }

    #[test]
    fn test_exclusions_serialize() {
        let json = serde_json::to_string(&ExclusionConfig::none()).unwrap();
        assert!(json.contains("\"dot_files\":false"));
    }
}
