//! JSON snapshot of an inventory.
//!
//! A [`Snapshot`] gathers the walk and blame results of an [`Inventory`]
//! into one serializable value: the exclusion settings, the total line
//! count, the file registry, the per-filetype counts and the per-author
//! counts.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::blame::{AttributionOutcome, AuthorCounts, GitHistory};
use crate::data::stats::{FileRecord, TypeCounts};
use crate::error::WhodunnitError;
use crate::options::{BlameOptions, ExclusionConfig, WalkOptions};
use crate::pipeline::Inventory;
use crate::Result;

/// Per-filetype counts with both orderings.
#[derive(Debug, Clone, Serialize)]
pub struct FileCounts {
    pub counts: TypeCounts,
    pub sorted_alphabetical: Vec<String>,
    pub sorted_by_count: Vec<String>,
}

/// Per-author counts, ranked.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlameCounts {
    pub authors: AuthorCounts,
    pub sorted_authors: Vec<String>,
}

/// Whether the blame phase produced anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryStatus {
    /// Blame was not requested
    NotRun,
    /// Blame ran against version history
    Attributed {
        files_attributed: usize,
        files_skipped: usize,
    },
    /// The root is not under version control
    NoHistory { reason: String },
}

/// Everything known about one inventoried root.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub root: PathBuf,
    pub exclusions: ExclusionConfig,
    pub total_lines: u64,
    pub included_files: Vec<FileRecord>,
    pub file_counts: FileCounts,
    pub history: HistoryStatus,
    pub blame: BlameCounts,
}

impl Snapshot {
    /// Capture the current results of `inventory`.
    ///
    /// The walk must have completed; the blame phase is optional.
    pub fn capture(inventory: &Inventory) -> Result<Self> {
        let report = inventory
            .walk_report()
            .ok_or(WhodunnitError::InvalidPhase {
                action: "export",
                phase: inventory.phase(),
            })?;

        let (history, blame) = match inventory.attribution() {
            None => (HistoryStatus::NotRun, BlameCounts::default()),
            Some(AttributionOutcome::NoHistory { reason }) => (
                HistoryStatus::NoHistory {
                    reason: reason.clone(),
                },
                BlameCounts::default(),
            ),
            Some(AttributionOutcome::Attributed(attribution)) => (
                HistoryStatus::Attributed {
                    files_attributed: attribution.files_attributed,
                    files_skipped: attribution.files_skipped,
                },
                BlameCounts {
                    authors: attribution.authors.clone(),
                    sorted_authors: attribution.sorted_authors.clone(),
                },
            ),
        };

        Ok(Self {
            root: inventory.root().to_path_buf(),
            exclusions: inventory.options().exclusions,
            total_lines: report.total_lines,
            included_files: report.files.clone(),
            file_counts: FileCounts {
                counts: report.counts.clone(),
                sorted_alphabetical: report.sorted_alphabetical.clone(),
                sorted_by_count: report.sorted_by_count.clone(),
            },
            history,
            blame,
        })
    }

    /// Serialize as compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walk and blame `root`, returning the snapshot as JSON.
///
/// A root outside version control is not an error; the snapshot records
/// `no_history` and an empty author map.
pub fn export_json(root: &Path, walk: WalkOptions, blame: BlameOptions) -> Result<String> {
    let mut inventory = Inventory::new(root, walk);
    inventory.walk()?;
    inventory.attribute(&GitHistory::new(root), blame, None)?;
    Snapshot::capture(&inventory)?.to_json()
}
