//! Line counting and the walk tally.
//!
//! Lines are counted as newline bytes. A final line without a terminating
//! `\n` is not counted, so `"a\nb"` is one line. This matches `wc -l`.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::classify::{detect_filetype, Classifier};
use super::stats::{type_orderings, FileRecord, TypeCount, TypeCounts, WalkReport};

const CHUNK_SIZE: usize = 32 * 1024;

/// Count the newline bytes in a stream, reading in 32 KiB chunks.
pub fn count_lines<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut count = 0u64;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => return Ok(count),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        count += count_lines_in(&buf[..read]);
    }
}

/// Count the newline bytes in a buffer.
pub fn count_lines_in(content: &[u8]) -> u64 {
    content.iter().filter(|&&b| b == b'\n').count() as u64
}

/// Accumulates counts for accepted files during a walk.
///
/// Owned by the single walking thread; nothing here is shared.
pub struct WalkTally<'c> {
    classifier: &'c dyn Classifier,
    counts: TypeCounts,
    files: Vec<FileRecord>,
    total_lines: u64,
}

impl<'c> WalkTally<'c> {
    /// Create an empty tally that classifies files with `classifier`.
    pub fn new(classifier: &'c dyn Classifier) -> Self {
        Self {
            classifier,
            counts: TypeCounts::new(),
            files: Vec::new(),
            total_lines: 0,
        }
    }

    /// Classify and count one accepted file.
    ///
    /// Returns the record that was added, or `None` when the file has no
    /// detectable filetype and was skipped.
    pub fn record(&mut self, path: &Path, content: &[u8]) -> Option<&FileRecord> {
        let filetype = detect_filetype(self.classifier, path, content)?;
        let lines = count_lines_in(content);

        self.counts
            .entry(filetype.clone())
            .or_insert_with(|| TypeCount::new(filetype.clone()))
            .count += lines;
        self.total_lines += lines;
        self.files
            .push(FileRecord::new(filetype, PathBuf::from(path), lines));

        self.files.last()
    }

    /// Running total of lines recorded so far.
    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    /// Finish the tally and compute the presentation orderings.
    pub fn finish(self) -> WalkReport {
        let (sorted_alphabetical, sorted_by_count) = type_orderings(&self.counts);
        WalkReport {
            counts: self.counts,
            files: self.files,
            total_lines: self.total_lines,
            sorted_alphabetical,
            sorted_by_count,
        }
    }
}
