//! The attribution engine.
//!
//! Runs after the walk, over its file registry. A pool of scoped worker
//! threads pulls `(file, index)` jobs from one bounded queue. Each worker
//! opens its own history session, attributes the file at the current
//! revision and folds the result into the shared aggregator. A file whose
//! query fails is skipped; it never stops the other files. Neither does a
//! worker that cannot open its session: the rest drain the queue.

use std::path::Path;

use crossbeam::channel::{bounded, Receiver};

use super::attribution::{AttributionAggregator, AttributionOutcome};
use super::history::{HistorySession, HistorySource};
use super::progress::{BlameProgress, ProgressChannel};
use crate::data::stats::FileRecord;
use crate::error::WhodunnitError;
use crate::options::BlameOptions;
use crate::Result;

/// Jobs queued per worker.
const QUEUE_DEPTH_PER_WORKER: usize = 2;

struct Job<'a> {
    file: &'a FileRecord,
    index: usize,
}

/// Read-only state shared by every worker.
struct WorkerContext<'a, H> {
    root: &'a Path,
    source: &'a H,
    aggregator: &'a AttributionAggregator,
    progress: Option<&'a ProgressChannel>,
    total: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct WorkerTally {
    attributed: usize,
    skipped: usize,
}

/// Fans per-file history queries out over a bounded worker pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributionEngine {
    options: BlameOptions,
}

impl AttributionEngine {
    pub fn new(options: BlameOptions) -> Self {
        Self { options }
    }

    /// Attribute every file in `files` (as produced by a walk of `root`).
    ///
    /// Returns [`AttributionOutcome::NoHistory`] without spawning any worker
    /// when `source` reports that `root` is not tracked. Any other failure
    /// to open the source or resolve its current revision is an error.
    pub fn attribute<H: HistorySource>(
        &self,
        root: &Path,
        files: &[FileRecord],
        source: &H,
        progress: Option<&ProgressChannel>,
    ) -> Result<AttributionOutcome> {
        match source.open() {
            Ok(session) => {
                session.resolve_head()?;
            }
            Err(err) if err.is_not_tracked() => {
                tracing::info!(root = %root.display(), "no history source, skipping attribution");
                return Ok(AttributionOutcome::NoHistory {
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        }

        let aggregator = AttributionAggregator::new();
        if files.is_empty() {
            return Ok(AttributionOutcome::Attributed(aggregator.finish(0, 0)));
        }

        let workers = self.options.worker_count(files.len());
        tracing::info!(files = files.len(), workers, "starting attribution");

        let context = WorkerContext {
            root,
            source,
            aggregator: &aggregator,
            progress,
            total: files.len(),
        };
        let context = &context;

        let results = crossbeam::thread::scope(|s| {
            let (job_tx, job_rx) = bounded::<Job<'_>>(workers * QUEUE_DEPTH_PER_WORKER);

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let jobs = job_rx.clone();
                    s.spawn(move |_| run_worker(context, jobs))
                })
                .collect();
            drop(job_rx);

            for (i, file) in files.iter().enumerate() {
                if job_tx.send(Job { file, index: i + 1 }).is_err() {
                    // Every worker has exited.
                    break;
                }
            }
            drop(job_tx);

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| WhodunnitError::WorkerPanic)?;

        let mut tally = WorkerTally::default();
        for result in results {
            let worker = result.map_err(|_| WhodunnitError::WorkerPanic)?;
            tally.attributed += worker.attributed;
            tally.skipped += worker.skipped;
        }
        // Files never picked up because every worker failed to start.
        let unprocessed = files.len() - tally.attributed - tally.skipped;
        if unprocessed > 0 {
            tracing::warn!(files = unprocessed, "no worker left to attribute files");
            tally.skipped += unprocessed;
        }

        let report = aggregator.finish(tally.attributed, tally.skipped);
        tracing::info!(
            authors = report.authors.len(),
            attributed = tally.attributed,
            skipped = tally.skipped,
            progress_dropped = progress.map_or(0, ProgressChannel::dropped),
            "attribution complete"
        );
        Ok(AttributionOutcome::Attributed(report))
    }
}

/// Attribute jobs until the queue closes.
///
/// A worker whose session cannot be opened exits at once and leaves the
/// queue to the others.
fn run_worker<H: HistorySource>(
    context: &WorkerContext<'_, H>,
    jobs: Receiver<Job<'_>>,
) -> WorkerTally {
    let mut tally = WorkerTally::default();
    let started = context
        .source
        .open()
        .and_then(|session| session.resolve_head().map(|revision| (session, revision)));
    let (mut session, revision) = match started {
        Ok(started) => started,
        Err(err) => {
            tracing::warn!(error = %err, "blame worker could not start");
            return tally;
        }
    };

    for job in jobs.iter() {
        let relative = job
            .file
            .path
            .strip_prefix(context.root)
            .unwrap_or(&job.file.path);

        if let Some(progress) = context.progress {
            progress.offer(BlameProgress {
                current: job.index,
                total: context.total,
                path: relative.to_path_buf(),
            });
        }

        match session.attribute(relative, &revision) {
            Ok(lines) => {
                context.aggregator.fold_file(&job.file.filetype, &lines);
                tally.attributed += 1;
            }
            Err(err) => {
                tracing::debug!(path = %relative.display(), error = %err, "skipping file");
                tally.skipped += 1;
            }
        }
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blame::history::{HistoryError, LineAuthor};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory history: every line of a file belongs to the listed authors.
    struct FakeHistory {
        tracked: bool,
        files: HashMap<PathBuf, Vec<&'static str>>,
        opened: AtomicUsize,
        /// 1-based `open` calls that fail, counting the initial check
        failing_opens: Vec<usize>,
    }

    impl FakeHistory {
        fn new(files: &[(&str, Vec<&'static str>)]) -> Self {
            Self {
                tracked: true,
                files: files
                    .iter()
                    .map(|(path, authors)| (PathBuf::from(path), authors.clone()))
                    .collect(),
                opened: AtomicUsize::new(0),
                failing_opens: Vec::new(),
            }
        }

        fn failing_opens(mut self, opens: &[usize]) -> Self {
            self.failing_opens = opens.to_vec();
            self
        }

        fn untracked() -> Self {
            Self {
                tracked: false,
                ..Self::new(&[])
            }
        }
    }

    struct FakeSession<'a> {
        files: &'a HashMap<PathBuf, Vec<&'static str>>,
    }

    impl HistorySource for FakeHistory {
        type Session = FakeSession<'static>;

        fn open(&self) -> std::result::Result<Self::Session, HistoryError> {
            let call = self.opened.fetch_add(1, Ordering::SeqCst) + 1;
            if self.failing_opens.contains(&call) {
                return Err(HistoryError::Open("transient".to_string()));
            }
            if !self.tracked {
                return Err(HistoryError::NotTracked {
                    path: PathBuf::from("/repo"),
                    message: "not a repository".to_string(),
                });
            }
            // Leaked so sessions can outlive the borrow in tests.
            let files: &'static HashMap<_, _> = Box::leak(Box::new(self.files.clone()));
            Ok(FakeSession { files })
        }
    }

    impl HistorySession for FakeSession<'_> {
        type Revision = ();

        fn resolve_head(&self) -> std::result::Result<(), HistoryError> {
            Ok(())
        }

        fn attribute(
            &mut self,
            path: &Path,
            _revision: &(),
        ) -> std::result::Result<Vec<LineAuthor>, HistoryError> {
            let authors = self.files.get(path).ok_or_else(|| HistoryError::Attribution {
                path: path.to_path_buf(),
                message: "not in history".to_string(),
            })?;
            Ok(authors
                .iter()
                .enumerate()
                .map(|(i, author)| LineAuthor::new(i as u32 + 1, *author))
                .collect())
        }
    }

    fn record(filetype: &str, path: &str, lines: u64) -> FileRecord {
        FileRecord::new(filetype, Path::new("/repo").join(path), lines)
    }

    fn engine(workers: usize) -> AttributionEngine {
        AttributionEngine::new(BlameOptions::new().workers(workers))
    }

    #[test]
    fn test_single_author_across_types() {
        let history = FakeHistory::new(&[
            ("a.go", vec!["alice"; 4]),
            ("b.py", vec!["alice"; 6]),
        ]);
        let files = vec![record("Go", "a.go", 4), record("Python", "b.py", 6)];

        let outcome = engine(2)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();
        let report = outcome.report().unwrap();
        let alice = &report.authors["alice"];

        assert_eq!(alice.total_lines, 10);
        assert_eq!(alice.lines_for("Go"), 4);
        assert_eq!(alice.lines_for("Python"), 6);
        assert_eq!(report.files_attributed, 2);
    }

    #[test]
    fn test_untracked_root_is_soft() {
        let history = FakeHistory::untracked();
        let files = vec![record("Go", "a.go", 4)];

        let outcome = engine(4)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();

        assert!(outcome.is_no_history());
        assert!(outcome.authors().is_empty());
        // Only the probe opened the source; no worker was spawned.
        assert_eq!(history.opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_files_are_skipped() {
        let history = FakeHistory::new(&[("tracked.rs", vec!["bob", "bob"])]);
        let files = vec![
            record("Rust", "tracked.rs", 2),
            record("Rust", "untracked.rs", 9),
        ];

        let outcome = engine(2)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.files_attributed, 1);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(report.authors["bob"].total_lines, 2);
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let mut entries = Vec::new();
        let mut files = Vec::new();
        let authors = ["ana", "ben", "cai", "dee"];
        for i in 0..64 {
            let path = format!("src/f{i}.rs");
            let lines: Vec<&'static str> = (0..(i % 7 + 1)).map(|j| authors[(i + j) % 4]).collect();
            let filetype = if i % 3 == 0 { "Rust" } else { "Go" };
            files.push(record(filetype, &path, lines.len() as u64));
            entries.push((path, lines));
        }
        let entries: Vec<(&str, Vec<&'static str>)> = entries
            .iter()
            .map(|(p, l)| (p.as_str(), l.clone()))
            .collect();
        let history = FakeHistory::new(&entries);

        let one = engine(1)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();
        let eight = engine(8)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();

        assert_eq!(one, eight);
        let report = one.report().unwrap();
        let expected: u64 = files.iter().map(|f| f.lines).sum();
        assert_eq!(report.total_lines(), expected);
    }

    #[test]
    fn test_each_worker_opens_its_own_session() {
        let history = FakeHistory::new(&[("a.rs", vec!["x"]), ("b.rs", vec!["y"])]);
        let files = vec![record("Rust", "a.rs", 1), record("Rust", "b.rs", 1)];

        engine(2)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();

        // One probe plus one session per worker.
        assert_eq!(history.opened.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_progress_is_best_effort() {
        let history = FakeHistory::new(&[("a.rs", vec!["x"]), ("b.rs", vec!["y"]), ("c.rs", vec!["z"])]);
        let files = vec![
            record("Rust", "a.rs", 1),
            record("Rust", "b.rs", 1),
            record("Rust", "c.rs", 1),
        ];

        // Nobody reads the receiver; a one-slot queue fills up and the rest
        // of the updates are dropped without stalling the workers.
        let (progress, receiver) = ProgressChannel::bounded(1);
        let outcome = engine(2)
            .attribute(Path::new("/repo"), &files, &history, Some(&progress))
            .unwrap();

        assert_eq!(outcome.report().unwrap().files_attributed, 3);
        assert_eq!(progress.dropped(), 2);
        let update = receiver.try_recv().unwrap();
        assert_eq!(update.total, 3);
        assert!(update.path.is_relative());
    }

    #[test]
    fn test_empty_registry() {
        let history = FakeHistory::new(&[]);
        let outcome = engine(4)
            .attribute(Path::new("/repo"), &[], &history, None)
            .unwrap();

        assert_eq!(outcome.report().unwrap().authors.len(), 0);
    }

    fn many_files(count: usize) -> (FakeHistory, Vec<FileRecord>) {
        let names: Vec<String> = (0..count).map(|i| format!("f{i}.rs")).collect();
        let entries: Vec<(&str, Vec<&'static str>)> = names
            .iter()
            .map(|name| (name.as_str(), vec!["ana", "ben"]))
            .collect();
        let files = names.iter().map(|name| record("Rust", name, 2)).collect();
        (FakeHistory::new(&entries), files)
    }

    #[test]
    fn test_worker_start_failure_leaves_queue_to_others() {
        let (history, files) = many_files(10);
        // Call 1 is the initial check; call 2 is the first worker.
        let history = history.failing_opens(&[2]);

        let outcome = engine(2)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.files_attributed, 10);
        assert_eq!(report.files_skipped, 0);
        assert_eq!(report.total_lines(), 20);
    }

    #[test]
    fn test_all_workers_failing_skips_every_file() {
        let (history, files) = many_files(10);
        let history = history.failing_opens(&[2, 3]);

        let outcome = engine(2)
            .attribute(Path::new("/repo"), &files, &history, None)
            .unwrap();
        let report = outcome.report().unwrap();

        assert_eq!(report.files_attributed, 0);
        assert_eq!(report.files_skipped, 10);
        assert!(report.authors.is_empty());
    }

    #[test]
    fn test_initial_open_failure_is_an_error() {
        let (history, files) = many_files(2);
        let history = history.failing_opens(&[1]);

        let result = engine(2).attribute(Path::new("/repo"), &files, &history, None);
        assert!(matches!(result, Err(WhodunnitError::GitError(_))));
    }
}
