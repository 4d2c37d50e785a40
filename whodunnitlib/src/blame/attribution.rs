//! Per-author line counts.
//!
//! The [`AttributionAggregator`] is the only state written by more than one
//! blame worker. It holds every author behind one mutex; workers fold a whole
//! file's worth of lines per lock acquisition.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::history::LineAuthor;
use crate::data::stats::{rank_by_count, type_orderings, TypeCount, TypeCounts};

/// Lines attributed to one author, split by filetype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorAttribution {
    pub author: String,
    /// Sum of every entry in `lines_by_type`
    pub total_lines: u64,
    pub lines_by_type: TypeCounts,
    /// Filetypes in alphabetical order
    pub sorted_alphabetical: Vec<String>,
    /// Filetypes by descending line count
    pub sorted_by_count: Vec<String>,
}

impl AuthorAttribution {
    /// A new author with no lines.
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    /// Credit `lines` lines of `filetype` to this author.
    pub fn add(&mut self, filetype: &str, lines: u64) {
        self.lines_by_type
            .entry(filetype.to_string())
            .or_insert_with(|| TypeCount::new(filetype))
            .count += lines;
        self.total_lines += lines;
    }

    /// Lines of one filetype, zero if the author has none.
    pub fn lines_for(&self, filetype: &str) -> u64 {
        self.lines_by_type.get(filetype).map_or(0, |c| c.count)
    }

    fn compute_orderings(&mut self) {
        let (alphabetical, by_count) = type_orderings(&self.lines_by_type);
        self.sorted_alphabetical = alphabetical;
        self.sorted_by_count = by_count;
    }
}

/// Author counts keyed by author name.
pub type AuthorCounts = BTreeMap<String, AuthorAttribution>;

/// Shared accumulator for the blame phase.
#[derive(Debug, Default)]
pub struct AttributionAggregator {
    authors: Mutex<AuthorCounts>,
}

impl AttributionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file's attributed lines under a single lock.
    pub fn fold_file(&self, filetype: &str, lines: &[LineAuthor]) {
        if lines.is_empty() {
            return;
        }

        // Group first so the lock covers map updates only.
        let mut per_author: BTreeMap<&str, u64> = BTreeMap::new();
        for line in lines {
            *per_author.entry(line.author.as_str()).or_default() += 1;
        }

        let mut authors = self.authors.lock().unwrap_or_else(PoisonError::into_inner);
        for (author, count) in per_author {
            authors
                .entry(author.to_string())
                .or_insert_with(|| AuthorAttribution::new(author))
                .add(filetype, count);
        }
    }

    /// Number of distinct authors seen so far.
    pub fn author_count(&self) -> usize {
        self.authors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Consume the aggregator and compute orderings.
    pub fn finish(self, files_attributed: usize, files_skipped: usize) -> AttributionReport {
        let mut authors = self
            .authors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        for attribution in authors.values_mut() {
            attribution.compute_orderings();
        }
        let sorted_authors = rank_by_count(authors.iter().map(|(k, v)| (k, v.total_lines)));

        AttributionReport {
            authors,
            sorted_authors,
            files_attributed,
            files_skipped,
        }
    }
}

/// Result of a completed blame phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionReport {
    pub authors: AuthorCounts,
    /// Authors by descending total, ties alphabetical
    pub sorted_authors: Vec<String>,
    /// Files whose history query succeeded
    pub files_attributed: usize,
    /// Files skipped because their history query failed
    pub files_skipped: usize,
}

impl AttributionReport {
    /// Authors in descending-by-total order.
    pub fn ranked(&self) -> impl Iterator<Item = &AuthorAttribution> {
        self.sorted_authors
            .iter()
            .filter_map(|name| self.authors.get(name))
    }

    /// Sum of every author's total.
    pub fn total_lines(&self) -> u64 {
        self.authors.values().map(|a| a.total_lines).sum()
    }
}

/// What the blame phase produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionOutcome {
    /// History was available and every file was processed
    Attributed(AttributionReport),
    /// The walk root is not under version control; nothing was attributed
    NoHistory { reason: String },
}

impl AttributionOutcome {
    /// The report, if history was available.
    pub fn report(&self) -> Option<&AttributionReport> {
        match self {
            AttributionOutcome::Attributed(report) => Some(report),
            AttributionOutcome::NoHistory { .. } => None,
        }
    }

    pub fn is_no_history(&self) -> bool {
        matches!(self, AttributionOutcome::NoHistory { .. })
    }

    /// Author counts; empty when there was no history.
    pub fn authors(&self) -> AuthorCounts {
        self.report()
            .map(|report| report.authors.clone())
            .unwrap_or_default()
    }
}
