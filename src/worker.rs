//! Background move computation
//!
//! A [`MoveWorker`] owns one thread running an [`AIEngine`] so a caller's
//! event loop never blocks on a search. Every submission is stamped with a
//! generation; replies to anything but the latest submission are dropped,
//! so a move computed for a board that has since changed is never applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::engine::{AIEngine, MoveRequest, Strategy};
use crate::search::TranspositionCache;

/// A finished move for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReply {
    /// Generation returned by the matching [`MoveWorker::submit`]
    pub generation: u64,
    pub best_move: Option<usize>,
    pub strategy: Strategy,
}

struct Job {
    generation: u64,
    request: MoveRequest,
}

/// Handle to a background engine thread.
///
/// Dropping the handle closes the job queue and joins the thread once its
/// current search finishes.
pub struct MoveWorker {
    jobs: Option<Sender<Job>>,
    replies: Receiver<WorkerReply>,
    latest: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl MoveWorker {
    /// Spawn the worker thread around `engine`.
    ///
    /// The thread keeps one [`TranspositionCache`] for its whole life, so
    /// consecutive mega moves of one match reuse earlier results.
    #[must_use]
    pub fn spawn(mut engine: AIEngine) -> Self {
        let (job_tx, job_rx) = channel::<Job>();
        let (reply_tx, reply_rx) = channel();
        let latest = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&latest);

        let handle = thread::spawn(move || {
            let mut cache = TranspositionCache::new();
            for job in job_rx {
                if job.generation < seen.load(Ordering::Acquire) {
                    trace!(generation = job.generation, "skipping superseded job");
                    continue;
                }
                let result = engine.get_move_with_stats(&job.request, Some(&mut cache));
                let reply = WorkerReply {
                    generation: job.generation,
                    best_move: result.best_move,
                    strategy: result.strategy,
                };
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
        });

        Self {
            jobs: Some(job_tx),
            replies: reply_rx,
            latest,
            handle: Some(handle),
        }
    }

    /// Queue `request` and return its generation.
    ///
    /// Generations start at 1 and increase with every call; submitting
    /// supersedes every earlier request.
    pub fn submit(&self, request: MoveRequest) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(jobs) = &self.jobs {
            if jobs.send(Job { generation, request }).is_err() {
                debug!(generation, "worker thread is gone");
            }
        }
        generation
    }

    /// Generation of the most recent submission (0 before the first)
    #[inline]
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Drain finished replies without blocking, returning the reply to the
    /// latest submission if it has arrived. Stale replies are discarded.
    pub fn poll_latest(&self) -> Option<WorkerReply> {
        let mut found = None;
        loop {
            match self.replies.try_recv() {
                Ok(reply) => found = self.keep_if_current(reply).or(found),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return found,
            }
        }
    }

    /// Block until the reply to the latest submission arrives or `timeout`
    /// passes. Stale replies are discarded.
    pub fn wait_latest(&self, timeout: Duration) -> Option<WorkerReply> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.replies.recv_timeout(remaining) {
                Ok(reply) => {
                    if let Some(reply) = self.keep_if_current(reply) {
                        return Some(reply);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn keep_if_current(&self, reply: WorkerReply) -> Option<WorkerReply> {
        let latest = self.latest_generation();
        if reply.generation == latest {
            Some(reply)
        } else {
            debug!(generation = reply.generation, latest, "discarding stale reply");
            None
        }
    }
}

impl Drop for MoveWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Mark};
    use crate::engine::{Difficulty, Variant};

    const WAIT: Duration = Duration::from_secs(10);

    fn request(board: &str, mover: Mark) -> MoveRequest {
        MoveRequest::new(board.parse::<Board>().unwrap(), mover)
            .difficulty(Difficulty::Impossible)
            .variant(Variant::Classic)
    }

    #[test]
    fn test_reply_for_single_submission() {
        let worker = MoveWorker::spawn(AIEngine::seeded(1));
        let generation = worker.submit(request("XX. OO. ...", Mark::X));
        assert_eq!(generation, 1);

        let reply = worker.wait_latest(WAIT).unwrap();
        assert_eq!(reply.generation, 1);
        assert_eq!(reply.best_move, Some(2));
        assert_eq!(reply.strategy, Strategy::Minimax);
    }

    #[test]
    fn test_generations_increase() {
        let worker = MoveWorker::spawn(AIEngine::seeded(1));
        assert_eq!(worker.latest_generation(), 0);
        let a = worker.submit(request("... ... ...", Mark::X));
        let b = worker.submit(request("X.. ... ...", Mark::O));
        assert!(b > a);
        assert_eq!(worker.latest_generation(), b);
    }

    #[test]
    fn test_only_latest_reply_is_delivered() {
        let worker = MoveWorker::spawn(AIEngine::seeded(1));
        worker.submit(request("... ... ...", Mark::X));
        worker.submit(request("XX. OO. ...", Mark::O));
        let last = worker.submit(request("XX. O.. ...", Mark::O));

        let reply = worker.wait_latest(WAIT).unwrap();
        assert_eq!(reply.generation, last);
        assert_eq!(reply.best_move, Some(2));
        assert_eq!(worker.poll_latest(), None);
    }

    #[test]
    fn test_full_board_reply() {
        let worker = MoveWorker::spawn(AIEngine::seeded(1));
        worker.submit(request("XOX XOO OXX", Mark::X));
        let reply = worker.wait_latest(WAIT).unwrap();
        assert_eq!(reply.best_move, None);
        assert_eq!(reply.strategy, Strategy::NoMove);
    }

    #[test]
    fn test_poll_before_any_reply() {
        let worker = MoveWorker::spawn(AIEngine::seeded(1));
        assert_eq!(worker.poll_latest(), None);
        assert_eq!(worker.wait_latest(Duration::from_millis(10)), None);
    }
}
