//! Hierarchical ignore rules.
//!
//! Each directory may carry a pattern file (`.gitignore` by default). Rules
//! loaded in a directory apply to everything below it, and a child's
//! predicate is its parent's predicate plus the child's own rules. A path is
//! excluded when any level excludes it.
//!
//! Each level is a gitignore matcher rooted at its declaring directory, so
//! pattern syntax (anchoring, directory-only patterns, `**`, negation within
//! one file) follows git. A negation cannot re-include a path that another
//! level excludes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::WhodunnitError;
use crate::Result;

/// The rules declared by one directory's pattern file.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    base: PathBuf,
    matcher: Gitignore,
}

impl IgnoreRules {
    /// Build rules for `base` from pattern-file text.
    ///
    /// Invalid patterns are skipped with a warning.
    pub fn parse(base: impl Into<PathBuf>, text: &str) -> Self {
        let base = base.into();
        let mut builder = GitignoreBuilder::new(&base);
        for line in text.lines() {
            if let Err(e) = builder.add_line(None, line) {
                tracing::warn!(pattern = line, error = %e, "skipping invalid ignore pattern");
            }
        }

        let matcher = builder.build().unwrap_or_else(|e| {
            tracing::warn!(dir = %base.display(), error = %e, "ignoring unusable pattern file");
            Gitignore::empty()
        });
        Self { base, matcher }
    }

    /// Load `dir/file_name` if it exists.
    ///
    /// A missing file is `Ok(None)`. Any other read failure is an error,
    /// since silently ignoring it would change what gets counted.
    pub fn load(dir: &Path, file_name: &str) -> Result<Option<Self>> {
        let path = dir.join(file_name);
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                Ok(Some(Self::parse(dir, &text)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(WhodunnitError::IgnoreFile { path, source }),
        }
    }

    /// Directory the rules were declared in.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Number of usable patterns, negations included.
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Whether these rules alone exclude `path`.
    ///
    /// Paths outside the declaring directory are never excluded.
    pub fn excludes(&self, path: &Path, is_dir: bool) -> bool {
        let Ok(relative) = path.strip_prefix(&self.base) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        self.matcher.matched(relative, is_dir).is_ignore()
    }
}

/// The effective ignore predicate at one directory: its own rules plus every
/// ancestor's.
///
/// Cloning is cheap; levels are shared between a parent and its children.
#[derive(Debug, Clone, Default)]
pub struct IgnorePredicate {
    levels: Vec<Arc<IgnoreRules>>,
}

impl IgnorePredicate {
    /// A predicate with no rules; only `.git` directories are excluded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose this predicate with a child directory's local rules.
    pub fn with_rules(&self, local: Option<IgnoreRules>) -> Self {
        match local {
            Some(rules) if !rules.is_empty() => {
                let mut levels = self.levels.clone();
                levels.push(Arc::new(rules));
                Self { levels }
            }
            _ => self.clone(),
        }
    }

    /// Resolve the predicate for `dir`, reading its pattern file.
    pub fn descend(&self, dir: &Path, file_name: &str) -> Result<Self> {
        let local = IgnoreRules::load(dir, file_name)?;
        if let Some(rules) = &local {
            tracing::debug!(dir = %dir.display(), patterns = rules.len(), "loaded ignore rules");
        }
        Ok(self.with_rules(local))
    }

    /// Number of rule levels in effect.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Whether `path` is excluded by this directory or any ancestor.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if is_dir && path.file_name().is_some_and(|name| name == ".git") {
            return true;
        }
        self.levels.iter().any(|rules| rules.excludes(path, is_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn rules(base: &str, text: &str) -> IgnoreRules {
        IgnoreRules::parse(base, text)
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let rules = rules("/r", "# comment\n\n   \n*.log\n");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_negation_within_one_file() {
        let rules = rules("/r", "*.log\n!keep.log\n");
        assert_eq!(rules.len(), 2);
        assert!(rules.excludes(Path::new("/r/drop.log"), false));
        assert!(!rules.excludes(Path::new("/r/keep.log"), false));
        assert!(!rules.excludes(Path::new("/r/sub/keep.log"), false));
    }

    #[test]
    fn test_negation_does_not_override_parent_level() {
        let root = IgnorePredicate::new().with_rules(Some(rules("/r", "*.log\n")));
        let child = root.with_rules(Some(rules("/r/child", "!keep.log\n")));

        assert!(child.is_excluded(Path::new("/r/child/keep.log"), false));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let rules = rules("/r", "a[\n*.tmp\n");
        assert_eq!(rules.len(), 1);
        assert!(rules.excludes(Path::new("/r/x.tmp"), false));
    }

    #[test]
    fn test_basename_pattern_matches_any_depth() {
        let rules = rules("/r", "*.log\n");
        assert!(rules.excludes(Path::new("/r/x.log"), false));
        assert!(rules.excludes(Path::new("/r/a/b/x.log"), false));
        assert!(!rules.excludes(Path::new("/r/x.rs"), false));
    }

    #[test]
    fn test_anchored_pattern() {
        let rules = rules("/r", "/build\ndocs/*.md\n");
        assert!(rules.excludes(Path::new("/r/build"), true));
        assert!(!rules.excludes(Path::new("/r/sub/build"), true));
        assert!(rules.excludes(Path::new("/r/docs/a.md"), false));
        assert!(!rules.excludes(Path::new("/r/docs/deep/a.md"), false));
        assert!(!rules.excludes(Path::new("/r/other/docs/a.md"), false));
    }

    #[test]
    fn test_double_star_crosses_directories() {
        let rules = rules("/r", "docs/**/*.md\n");
        assert!(rules.excludes(Path::new("/r/docs/a/b/c.md"), false));
        assert!(rules.excludes(Path::new("/r/docs/c.md"), false));
    }

    #[test]
    fn test_dir_only_pattern() {
        let rules = rules("/r", "target/\n");
        assert!(rules.excludes(Path::new("/r/target"), true));
        assert!(!rules.excludes(Path::new("/r/target"), false));
    }

    #[test]
    fn test_rules_do_not_apply_outside_base() {
        let rules = rules("/r/child", "*.txt\n");
        assert!(!rules.excludes(Path::new("/r/a.txt"), false));
        assert!(!rules.excludes(Path::new("/r/sibling/a.txt"), false));
        assert!(rules.excludes(Path::new("/r/child/a.txt"), false));
    }

    #[test]
    fn test_predicate_composes_parent_and_child() {
        let root = IgnorePredicate::new().with_rules(Some(rules("/r", "*.log\n")));
        let child = root.with_rules(Some(rules("/r/child", "*.tmp\n")));

        assert_eq!(child.depth(), 2);
        assert!(child.is_excluded(Path::new("/r/child/a.log"), false));
        assert!(child.is_excluded(Path::new("/r/child/a.tmp"), false));
        assert!(!root.is_excluded(Path::new("/r/a.tmp"), false));
        assert!(!root.is_excluded(Path::new("/r/sibling/a.tmp"), false));
    }

    #[test]
    fn test_git_dir_always_excluded() {
        let predicate = IgnorePredicate::new();
        assert!(predicate.is_excluded(Path::new("/r/.git"), true));
        assert!(predicate.is_excluded(Path::new("/r/sub/.git"), true));
        assert!(!predicate.is_excluded(Path::new("/r/.git"), false));
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let temp = tempdir().unwrap();
        let loaded = IgnoreRules::load(temp.path(), ".gitignore").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_reads_patterns() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".gitignore"), "*.log\nbuild/\n").unwrap();

        let loaded = IgnoreRules::load(temp.path(), ".gitignore").unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.base(), temp.path());
    }

    #[test]
    fn test_load_unreadable_file_is_error() {
        let temp = tempdir().unwrap();
        // A directory named like the pattern file cannot be read as a file.
        fs::create_dir(temp.path().join(".gitignore")).unwrap();

        let result = IgnoreRules::load(temp.path(), ".gitignore");
        assert!(matches!(result, Err(WhodunnitError::IgnoreFile { .. })));
    }
}
