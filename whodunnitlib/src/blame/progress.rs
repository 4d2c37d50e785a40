//! Best-effort progress reporting from blame workers.
//!
//! Workers offer an update before each file. If the queue is full, or
//! nobody is listening, the update is dropped on the spot; a slow observer
//! never holds up attribution. Observers should treat the stream as a
//! sample, not a log: updates can be missing and can arrive out of index
//! order across workers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};

/// Status of the blame phase as seen by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameProgress {
    /// 1-based index of the file being attributed
    pub current: usize,
    /// Number of files in the registry
    pub total: usize,
    /// Path of the file, relative to the walk root
    pub path: PathBuf,
}

/// Bounded progress queue with a drop-when-full policy.
#[derive(Debug)]
pub struct ProgressChannel {
    sender: Sender<BlameProgress>,
    dropped: AtomicUsize,
}

impl ProgressChannel {
    /// A queue holding up to `capacity` pending updates.
    pub fn bounded(capacity: usize) -> (Self, Receiver<BlameProgress>) {
        let (sender, receiver) = bounded(capacity);
        let channel = Self {
            sender,
            dropped: AtomicUsize::new(0),
        };
        (channel, receiver)
    }

    /// A queue with no buffer: an update is delivered only if an observer
    /// is blocked in `recv` at that moment.
    pub fn rendezvous() -> (Self, Receiver<BlameProgress>) {
        Self::bounded(0)
    }

    /// Offer an update without blocking. Returns whether it was accepted.
    pub fn offer(&self, update: BlameProgress) -> bool {
        match self.sender.try_send(update) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Number of updates dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
