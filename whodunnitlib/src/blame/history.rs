//! Line-level history sources.
//!
//! The attribution engine never talks to git directly. It opens sessions on
//! a [`HistorySource`]; each worker thread owns its own session, so no
//! repository handle or object cache is shared between threads.
//!
//! [`GitHistory`] is the git implementation, built on `gix`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::WhodunnitError;

/// Errors raised by a history source.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The directory is not under version control
    #[error("{path} is not tracked by a history source: {message}")]
    NotTracked { path: PathBuf, message: String },

    /// The source exists but could not be opened
    #[error("failed to open history source: {0}")]
    Open(String),

    /// The current revision could not be resolved (e.g. unborn HEAD)
    #[error("failed to resolve current revision: {0}")]
    Revision(String),

    /// Attributing a single file failed
    #[error("failed to attribute '{path}': {message}")]
    Attribution { path: PathBuf, message: String },
}

impl HistoryError {
    /// Whether this is the soft "nothing to attribute against" condition.
    pub fn is_not_tracked(&self) -> bool {
        matches!(self, HistoryError::NotTracked { .. })
    }
}

impl From<HistoryError> for WhodunnitError {
    fn from(err: HistoryError) -> Self {
        WhodunnitError::GitError(err.to_string())
    }
}

/// One attributed line of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAuthor {
    /// 1-based line number in the file at the attributed revision
    pub line: u32,
    /// Name of the author last responsible for the line
    pub author: String,
}

impl LineAuthor {
    pub fn new(line: u32, author: impl Into<String>) -> Self {
        Self {
            line,
            author: author.into(),
        }
    }
}

/// Something that can open attribution sessions.
///
/// Shared by reference across worker threads, so it must be `Sync`; the
/// sessions it opens are not shared.
pub trait HistorySource: Sync {
    type Session: HistorySession;

    /// Open a new, independent session.
    ///
    /// Must return [`HistoryError::NotTracked`] when there is no history
    /// to attribute against.
    fn open(&self) -> Result<Self::Session, HistoryError>;
}

/// A single-threaded handle onto a history source.
pub trait HistorySession {
    /// An opaque pointer to a point in history.
    type Revision;

    /// Resolve the revision attribution should run against.
    fn resolve_head(&self) -> Result<Self::Revision, HistoryError>;

    /// Attribute every line of `path` at `revision`.
    ///
    /// `path` is relative to the walk root.
    fn attribute(
        &mut self,
        path: &Path,
        revision: &Self::Revision,
    ) -> Result<Vec<LineAuthor>, HistoryError>;
}

/// Git history for the repository containing a directory.
#[derive(Debug, Clone)]
pub struct GitHistory {
    root: PathBuf,
}

impl GitHistory {
    /// History for the repository containing `root` (the walk root).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The walk root this history was created for.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl HistorySource for GitHistory {
    type Session = GitSession;

    fn open(&self) -> Result<GitSession, HistoryError> {
        let repo = gix::discover(&self.root).map_err(|e| HistoryError::NotTracked {
            path: self.root.clone(),
            message: e.to_string(),
        })?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| HistoryError::Open("repository has no work directory".to_string()))?
            .to_path_buf();

        // Paths handed to `attribute` are relative to the walk root, which
        // may be a subdirectory of the work tree.
        let root = self
            .root
            .canonicalize()
            .map_err(|e| HistoryError::Open(format!("{}: {}", self.root.display(), e)))?;
        let work_dir = work_dir
            .canonicalize()
            .map_err(|e| HistoryError::Open(format!("{}: {}", work_dir.display(), e)))?;
        let prefix = root
            .strip_prefix(&work_dir)
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(GitSession {
            repo,
            prefix,
            authors: HashMap::new(),
        })
    }
}

/// A `gix` repository handle owned by one worker.
pub struct GitSession {
    repo: gix::Repository,
    prefix: PathBuf,
    authors: HashMap<gix::ObjectId, String>,
}

impl GitSession {
    fn author_of(&mut self, commit_id: gix::ObjectId) -> Result<String, String> {
        if let Some(name) = self.authors.get(&commit_id) {
            return Ok(name.clone());
        }
        let commit = self
            .repo
            .find_commit(commit_id)
            .map_err(|e| format!("failed to find commit {}: {}", commit_id, e))?;
        let name = commit
            .author()
            .map_err(|e| format!("failed to decode author of {}: {}", commit_id, e))?
            .name
            .to_string();
        self.authors.insert(commit_id, name.clone());
        Ok(name)
    }
}

impl HistorySession for GitSession {
    type Revision = gix::ObjectId;

    fn resolve_head(&self) -> Result<gix::ObjectId, HistoryError> {
        self.repo
            .head_commit()
            .map(|commit| commit.id)
            .map_err(|e| HistoryError::Revision(e.to_string()))
    }

    fn attribute(
        &mut self,
        path: &Path,
        revision: &gix::ObjectId,
    ) -> Result<Vec<LineAuthor>, HistoryError> {
        let failed = |message: String| HistoryError::Attribution {
            path: path.to_path_buf(),
            message,
        };

        let repo_path = self.prefix.join(path);
        let repo_path = gix::path::to_unix_separators_on_windows(gix::path::into_bstr(
            repo_path.as_path(),
        ));

        let outcome = self
            .repo
            .blame_file(&repo_path, *revision, Default::default())
            .map_err(|e| failed(e.to_string()))?;

        let mut lines = Vec::new();
        for entry in &outcome.entries {
            let author = self.author_of(entry.commit_id).map_err(failed)?;
            let start = entry.start_in_blamed_file + 1;
            for offset in 0..entry.len.get() {
                lines.push(LineAuthor::new(start + offset, author.clone()));
            }
        }
        Ok(lines)
    }
}
