//! Core data structures for line counts.
//!
//! The walk produces three shapes that everything downstream consumes:
//!
//! - **FileRecord**: one accepted file, its detected filetype and line count
//! - **TypeCount**: lines summed per filetype
//! - **WalkReport**: the counts, the file registry and the grand total,
//!   plus the two presentation orderings of the filetypes
//!
//! Orderings are computed here so the walk totals and the per-author
//! breakdowns share one tie-breaking rule: descending by count, ties in
//! alphabetical order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A file that survived every filter during the walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Detected filetype label (e.g. "Rust", or ".xyz" for unknown extensions)
    pub filetype: String,
    /// Path to the file, rooted at the walk root
    pub path: PathBuf,
    /// Number of newline bytes in the file
    pub lines: u64,
}

impl FileRecord {
    /// Create a new file record.
    pub fn new(filetype: impl Into<String>, path: PathBuf, lines: u64) -> Self {
        Self {
            filetype: filetype.into(),
            path,
            lines,
        }
    }
}

/// Lines counted for one filetype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub filetype: String,
    pub count: u64,
}

impl TypeCount {
    /// Create an empty count for a filetype.
    pub fn new(filetype: impl Into<String>) -> Self {
        Self {
            filetype: filetype.into(),
            count: 0,
        }
    }
}

/// Line counts keyed by filetype.
pub type TypeCounts = BTreeMap<String, TypeCount>;

/// Keys ordered descending by count, ties broken alphabetically.
///
/// The input is collected in alphabetical order first and then stable-sorted,
/// so equal counts keep their alphabetical order.
pub fn rank_by_count<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a String, u64)>,
{
    let mut ranked: Vec<(&String, u64)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| a.0.cmp(b.0));
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(key, _)| key.clone()).collect()
}

/// Filetype keys of `counts` in (alphabetical, descending-by-count) order.
pub fn type_orderings(counts: &TypeCounts) -> (Vec<String>, Vec<String>) {
    let alphabetical: Vec<String> = counts.keys().cloned().collect();
    let by_count = rank_by_count(counts.iter().map(|(k, v)| (k, v.count)));
    (alphabetical, by_count)
}

/// Result of walking a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkReport {
    /// Lines per filetype
    pub counts: TypeCounts,
    /// Accepted files in encounter order
    pub files: Vec<FileRecord>,
    /// Sum of all lines counted
    pub total_lines: u64,
    /// Filetypes in alphabetical order
    pub sorted_alphabetical: Vec<String>,
    /// Filetypes by descending line count
    pub sorted_by_count: Vec<String>,
}

impl WalkReport {
    /// Number of files accepted by the walk.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Line count for one filetype, zero if it never occurred.
    pub fn lines_for(&self, filetype: &str) -> u64 {
        self.counts.get(filetype).map_or(0, |c| c.count)
    }

    /// Counts in descending-by-count order.
    pub fn ranked(&self) -> impl Iterator<Item = &TypeCount> {
        self.sorted_by_count
            .iter()
            .filter_map(|key| self.counts.get(key))
    }
}
