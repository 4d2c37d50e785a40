//! Content-based file exclusion.
//!
//! A [`ContentFilter`] is a chain of named checks over a file's path and
//! bytes. The binary check is always present; the others are added only
//! when the [`ExclusionConfig`] enables them, so a disabled check is never
//! run at all.

use std::fmt;
use std::path::Path;

use super::inspect;
use crate::options::ExclusionConfig;

type CheckFn = dyn Fn(&Path, &[u8]) -> bool + Send + Sync;

struct Check {
    name: &'static str,
    test: Box<CheckFn>,
}

/// Ordered set of exclusion checks; a file is ignored if any check matches.
pub struct ContentFilter {
    checks: Vec<Check>,
}

impl fmt::Debug for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentFilter")
            .field("checks", &self.check_names())
            .finish()
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFilter {
    /// A filter with only the always-on binary check.
    pub fn new() -> Self {
        let mut filter = Self { checks: Vec::new() };
        filter.push("binary", |_, content| inspect::is_binary(content));
        filter
    }

    /// Build the filter for an exclusion config.
    pub fn from_config(config: &ExclusionConfig) -> Self {
        let mut filter = Self::new();
        if config.dot_files {
            filter.push("dotfile", |path, _| inspect::is_dotfile(path));
        }
        if config.config_files {
            filter.push("configuration", |path, _| inspect::is_configuration(path));
        }
        if config.generated_files {
            filter.push("generated", inspect::is_generated);
        }
        if config.vendor_files {
            filter.push("vendor", |path, _| inspect::is_vendor(path));
        }
        filter
    }

    /// Add a custom check after the existing ones.
    pub fn with_check<F>(mut self, name: &'static str, test: F) -> Self
    where
        F: Fn(&Path, &[u8]) -> bool + Send + Sync + 'static,
    {
        self.push(name, test);
        self
    }

    fn push<F>(&mut self, name: &'static str, test: F)
    where
        F: Fn(&Path, &[u8]) -> bool + Send + Sync + 'static,
    {
        self.checks.push(Check {
            name,
            test: Box::new(test),
        });
    }

    /// Names of the active checks, in evaluation order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name).collect()
    }

    /// Name of the first check that matches, if any.
    pub fn matching_check(&self, path: &Path, content: &[u8]) -> Option<&'static str> {
        self.checks
            .iter()
            .find(|check| (check.test)(path, content))
            .map(|check| check.name)
    }

    /// Whether the file should be left out of the counts.
    pub fn is_ignored(&self, path: &Path, content: &[u8]) -> bool {
        self.matching_check(path, content).is_some()
    }
}
