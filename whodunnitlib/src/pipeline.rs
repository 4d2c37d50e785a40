//! The two-phase inventory pipeline.
//!
//! An [`Inventory`] owns everything produced for one root: the walk report
//! and, once the blame phase has run, its outcome. Steps must be taken in
//! order:
//!
//! ```text
//! Idle -> Walking -> WalkComplete -> Attributing -> Done
//! ```
//!
//! Calling a step from the wrong phase is an error, not a silent no-op.

use std::path::{Path, PathBuf};

use crate::blame::{AttributionEngine, AttributionOutcome, HistorySource, ProgressChannel};
use crate::data::stats::WalkReport;
use crate::error::WhodunnitError;
use crate::options::{BlameOptions, WalkOptions};
use crate::source::walk;
use crate::Result;

/// Where an [`Inventory`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has run yet
    Idle,
    /// The directory walk is in progress
    Walking,
    /// File registry and type counts are final
    WalkComplete,
    /// Blame workers are running
    Attributing,
    /// Both phases are finished
    Done,
}

/// Results for one inventoried root.
#[derive(Debug)]
pub struct Inventory {
    root: PathBuf,
    options: WalkOptions,
    phase: Phase,
    walk_report: Option<WalkReport>,
    attribution: Option<AttributionOutcome>,
}

impl Inventory {
    pub fn new(root: impl Into<PathBuf>, options: WalkOptions) -> Self {
        Self {
            root: root.into(),
            options,
            phase: Phase::Idle,
            walk_report: None,
            attribution: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The walk report, once the walk has completed.
    pub fn walk_report(&self) -> Option<&WalkReport> {
        self.walk_report.as_ref()
    }

    /// The blame outcome.
    ///
    /// `None` means the blame phase has not run; a root without history
    /// yields `Some(AttributionOutcome::NoHistory { .. })`.
    pub fn attribution(&self) -> Option<&AttributionOutcome> {
        self.attribution.as_ref()
    }

    /// Run the directory walk. Only valid from [`Phase::Idle`].
    ///
    /// A failed walk leaves the inventory idle.
    pub fn walk(&mut self) -> Result<&WalkReport> {
        self.expect_phase("walk", Phase::Idle)?;

        self.phase = Phase::Walking;
        match walk(&self.root, &self.options) {
            Ok(report) => {
                self.phase = Phase::WalkComplete;
                Ok(self.walk_report.insert(report))
            }
            Err(err) => {
                self.phase = Phase::Idle;
                Err(err)
            }
        }
    }

    /// Attribute the walked files. Only valid from [`Phase::WalkComplete`].
    ///
    /// A failed blame phase returns the inventory to `WalkComplete`.
    pub fn attribute<H: HistorySource>(
        &mut self,
        source: &H,
        options: BlameOptions,
        progress: Option<&ProgressChannel>,
    ) -> Result<&AttributionOutcome> {
        self.expect_phase("attribute", Phase::WalkComplete)?;
        let files = match &self.walk_report {
            Some(report) => report.files.as_slice(),
            None => &[],
        };

        self.phase = Phase::Attributing;
        match AttributionEngine::new(options).attribute(&self.root, files, source, progress) {
            Ok(outcome) => {
                self.phase = Phase::Done;
                Ok(self.attribution.insert(outcome))
            }
            Err(err) => {
                self.phase = Phase::WalkComplete;
                Err(err)
            }
        }
    }

    fn expect_phase(&self, action: &'static str, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(WhodunnitError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
