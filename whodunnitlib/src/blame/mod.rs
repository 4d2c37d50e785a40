//! Blame: credit counted lines to the authors who last touched them.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **History**: the [`HistorySource`] seam and its git implementation
//! - **Engine**: a bounded worker pool that attributes every walked file
//! - **Attribution**: the shared per-author aggregator and its report
//! - **Progress**: a lossy, never-blocking progress queue
//!
//! ## Example
//!
//! ```rust,ignore
//! use whodunnitlib::blame::{AttributionEngine, GitHistory, ProgressChannel};
//! use whodunnitlib::{walk, BlameOptions, WalkOptions};
//!
//! let report = walk(".", &WalkOptions::new())?;
//! let (progress, updates) = ProgressChannel::bounded(16);
//! let outcome = AttributionEngine::new(BlameOptions::new())
//!     .attribute(".".as_ref(), &report.files, &GitHistory::new("."), Some(&progress))?;
//! ```

pub mod attribution;
pub mod engine;
pub mod history;
pub mod progress;

pub use attribution::{
    AttributionAggregator, AttributionOutcome, AttributionReport, AuthorAttribution, AuthorCounts,
};
pub use engine::AttributionEngine;
pub use history::{GitHistory, GitSession, HistoryError, HistorySession, HistorySource, LineAuthor};
pub use progress::{BlameProgress, ProgressChannel};
