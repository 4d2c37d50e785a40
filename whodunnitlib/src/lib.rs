//! # whodunnitlib
//!
//! Inventory a source tree: count the lines of every eligible file by
//! filetype, then credit those lines to the authors who last changed them.
//!
//! ## Overview
//!
//! An inventory runs in two strictly ordered phases:
//!
//! - **Walk**: a single-threaded recursive traversal that honours
//!   per-directory ignore files, drops binary, dotfile, configuration,
//!   generated and vendored files, classifies what is left and counts its
//!   lines
//! - **Blame**: a bounded worker pool that attributes every walked file line
//!   by line against version history and folds the results into per-author,
//!   per-filetype counts
//!
//! A root that is not under version control is not an error: the blame
//! phase reports "no history" and the walk results stand on their own.
//!
//! ## Features
//!
//! - **Hierarchical ignore files**: rules apply to the declaring directory
//!   and everything below it, never to siblings or parents
//! - **Pluggable history**: the engine talks to a [`HistorySource`]; git via
//!   `gix` is built in
//! - **Non-blocking progress**: workers never wait on a slow observer
//! - **Pure Rust data types**: returns structured data, no terminal I/O
//!
//! ## Example
//!
//! ```rust
//! use whodunnitlib::{BlameOptions, GitHistory, Inventory, WalkOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("a.go"), "package a\n\nfunc A() {}\n").unwrap();
//! fs::write(dir.path().join("build.log"), "noise\n").unwrap();
//! fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
//!
//! let mut inventory = Inventory::new(dir.path(), WalkOptions::new());
//! let report = inventory.walk().unwrap();
//! assert_eq!(report.total_lines, 3);
//! assert_eq!(report.file_count(), 1);
//!
//! // A temporary directory has no history to attribute against.
//! let outcome = inventory
//!     .attribute(&GitHistory::new(dir.path()), BlameOptions::new(), None)
//!     .unwrap();
//! assert!(outcome.is_no_history());
//! ```

pub mod blame;
pub mod data;
pub mod error;
pub mod export;
pub mod options;
pub mod pipeline;
pub mod source;

pub use blame::{
    AttributionEngine, AttributionOutcome, AttributionReport, AuthorAttribution, AuthorCounts,
    BlameProgress, GitHistory, HistoryError, HistorySession, HistorySource, LineAuthor,
    ProgressChannel,
};
pub use data::{Classifier, FileRecord, LanguageClassifier, TypeCount, TypeCounts, WalkReport};
pub use error::WhodunnitError;
pub use export::{export_json, HistoryStatus, Snapshot};
pub use options::{BlameOptions, ExclusionConfig, WalkOptions, DEFAULT_IGNORE_FILE};
pub use pipeline::{Inventory, Phase};
pub use source::{walk, walk_with, ContentFilter};

/// Result type for whodunnitlib operations
pub type Result<T> = std::result::Result<T, WhodunnitError>;
