//! Data collection: classify files and count their lines.
//!
//! This module handles the second half of the walk phase: turning an
//! accepted file into a filetype and a line count. It provides:
//!
//! - **Classification**: filetype detection with an extension fallback
//! - **Counting**: newline counting and the per-walk tally
//! - **Statistics**: `FileRecord`, `TypeCount`, `WalkReport` and orderings
//!
//! ## Example
//!
//! ```rust
//! use whodunnitlib::data::{count_lines_in, LanguageClassifier, WalkTally};
//! use std::path::Path;
//!
//! let classifier = LanguageClassifier::new();
//! let mut tally = WalkTally::new(&classifier);
//! tally.record(Path::new("main.go"), b"package main\n");
//!
//! let report = tally.finish();
//! assert_eq!(report.lines_for("Go"), 1);
//! assert_eq!(count_lines_in(b"a\nb"), 1);
//! ```

pub mod classify;
pub mod counter;
pub mod stats;

pub use classify::{detect_filetype, extension_of, Classifier, LanguageClassifier};
pub use counter::{count_lines, count_lines_in, WalkTally};
pub use stats::{rank_by_count, type_orderings, FileRecord, TypeCount, TypeCounts, WalkReport};
