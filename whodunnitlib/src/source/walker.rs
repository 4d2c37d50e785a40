//! Directory traversal.
//!
//! The walker descends depth-first from the root. At each directory it
//! resolves the ignore predicate (inherited rules plus the local pattern
//! file), skips excluded children, recurses into subdirectories and hands
//! every surviving regular file to the content filter and then the tally.
//!
//! Any I/O error aborts the whole walk; there is no partial result.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::filter::ContentFilter;
use super::ignore::IgnorePredicate;
use crate::data::classify::{Classifier, LanguageClassifier};
use crate::data::counter::WalkTally;
use crate::data::stats::WalkReport;
use crate::error::WhodunnitError;
use crate::options::WalkOptions;
use crate::Result;

/// Walk a directory tree with the built-in classifier.
///
/// # Example
///
/// ```rust
/// use whodunnitlib::{walk, WalkOptions};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("a.go"), "package a\n\nfunc A() {}\n").unwrap();
/// fs::write(dir.path().join("b.py"), "1\n2\n3\n4\n5\n").unwrap();
///
/// let report = walk(dir.path(), &WalkOptions::new()).unwrap();
/// assert_eq!(report.total_lines, 8);
/// assert_eq!(report.lines_for("Go"), 3);
/// assert_eq!(report.lines_for("Python"), 5);
/// ```
pub fn walk(root: impl AsRef<Path>, options: &WalkOptions) -> Result<WalkReport> {
    walk_with(root, options, &LanguageClassifier::new())
}

/// Walk a directory tree with a caller-supplied classifier.
pub fn walk_with(
    root: impl AsRef<Path>,
    options: &WalkOptions,
    classifier: &dyn Classifier,
) -> Result<WalkReport> {
    Walker::new(root.as_ref(), options, classifier).run()
}

/// A configured single-threaded walk over one root.
pub struct Walker<'a> {
    root: PathBuf,
    ignore_file: String,
    filter: ContentFilter,
    classifier: &'a dyn Classifier,
}

impl<'a> Walker<'a> {
    /// Prepare a walk of `root`.
    pub fn new(root: &Path, options: &WalkOptions, classifier: &'a dyn Classifier) -> Self {
        Self {
            root: root.to_path_buf(),
            ignore_file: options.ignore_file.clone(),
            filter: ContentFilter::from_config(&options.exclusions),
            classifier,
        }
    }

    /// Replace the content filter built from the options.
    pub fn with_filter(mut self, filter: ContentFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run the walk to completion.
    pub fn run(self) -> Result<WalkReport> {
        if !self.root.exists() {
            return Err(WhodunnitError::PathNotFound(self.root));
        }
        if !self.root.is_dir() {
            return Err(WhodunnitError::NotADirectory(self.root));
        }

        let mut tally = WalkTally::new(self.classifier);
        self.walk_dir(&self.root, &IgnorePredicate::new(), &mut tally)?;

        let report = tally.finish();
        tracing::info!(
            root = %self.root.display(),
            files = report.files.len(),
            filetypes = report.counts.len(),
            lines = report.total_lines,
            "walk complete"
        );
        Ok(report)
    }

    fn walk_dir(&self, dir: &Path, inherited: &IgnorePredicate, tally: &mut WalkTally<'_>) -> Result<()> {
        let ignore = inherited.descend(dir, &self.ignore_file)?;

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry.map_err(|e| WhodunnitError::DirRead {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            let file_type = entry.file_type();
            let is_dir = file_type.is_dir();

            if ignore.is_excluded(path, is_dir) {
                tracing::debug!(path = %path.display(), "excluded by ignore rules");
                continue;
            }

            if is_dir {
                self.walk_dir(path, &ignore, tally)?;
            } else if file_type.is_file() {
                self.visit_file(path, tally)?;
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular file");
            }
        }

        Ok(())
    }

    fn visit_file(&self, path: &Path, tally: &mut WalkTally<'_>) -> Result<()> {
        let content = fs::read(path).map_err(|source| WhodunnitError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if let Some(check) = self.filter.matching_check(relative, &content) {
            tracing::debug!(path = %path.display(), check, "excluded by content filter");
            return Ok(());
        }

        if tally.record(path, &content).is_none() {
            tracing::debug!(path = %path.display(), "no filetype detected");
        }
        Ok(())
    }
}
