//! Source discovery: find the files to count.
//!
//! This module handles the first stage of the pipeline - walking the tree
//! and deciding which files take part. It provides:
//!
//! - **Ignore rules**: per-directory pattern files composed down the tree
//! - **Content filter**: binary, dotfile, config, generated and vendor checks
//! - **Walker**: the recursive traversal that feeds accepted files to the tally
//!
//! ## Example
//!
//! ```rust,ignore
//! use whodunnitlib::source::{walk, ContentFilter};
//! use whodunnitlib::{ExclusionConfig, WalkOptions};
//!
//! let options = WalkOptions::new().exclusions(ExclusionConfig::none());
//! let report = walk(".", &options)?;
//! ```

pub mod filter;
pub mod ignore;
pub mod inspect;
pub mod walker;

pub use filter::ContentFilter;
pub use self::ignore::{IgnorePredicate, IgnoreRules};
pub use walker::{walk, walk_with, Walker};
