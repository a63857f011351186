//! Parallel dispatch of independent search requests.
//!
//! A [`Dispatcher`] owns a fixed set of worker threads fed through a bounded
//! job queue. Every job is one complete [`search_with_stats`] call over a
//! shared, read-only item snapshot. Searches are never interrupted: when a
//! batch deadline passes, jobs still queued are skipped by the workers and
//! results arriving late are discarded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, bounded, unbounded};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::RawItem;
use crate::error::{FitError, Result, StructuredError};
use crate::search::{SearchOutcome, SearchRequest, search_with_stats};

/// Pool sizing and batch deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    pub workers: usize,
    pub queue_capacity: usize,
    /// Wall-clock budget for a whole batch.
    pub timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: 64,
            timeout: None,
        }
    }
}

/// Number of hardware threads, or 1 if unknown.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// What became of one request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Completed { outcome: SearchOutcome },
    Failed { error: StructuredError },
    TimedOut,
}

impl JobOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Outcomes of a batch, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub elapsed_ms: u64,
}

impl BatchReport {
    fn new(outcomes: Vec<JobOutcome>, elapsed: Duration) -> Self {
        let mut report = Self {
            completed: 0,
            failed: 0,
            timed_out: 0,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            outcomes,
        };
        for outcome in &report.outcomes {
            match outcome {
                JobOutcome::Completed { .. } => report.completed += 1,
                JobOutcome::Failed { .. } => report.failed += 1,
                JobOutcome::TimedOut => report.timed_out += 1,
            }
        }
        report
    }
}

struct Job {
    index: usize,
    request: SearchRequest,
    items: Arc<[RawItem]>,
    cancelled: Arc<AtomicBool>,
    reply: Sender<(usize, JobOutcome)>,
}

/// Fixed-size pool of search workers.
pub struct Dispatcher {
    options: DispatchOptions,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .field("workers", &self.workers.len())
            .finish()
    }
}

impl Dispatcher {
    /// Spawn the worker threads.
    pub fn start(options: DispatchOptions) -> Result<Self> {
        if options.workers == 0 {
            return Err(FitError::WorkerPool("worker count must be at least 1".to_string()));
        }
        if options.queue_capacity == 0 {
            return Err(FitError::WorkerPool("queue capacity must be at least 1".to_string()));
        }

        let (tx, rx) = bounded::<Job>(options.queue_capacity);
        let mut workers = Vec::with_capacity(options.workers);
        for id in 0..options.workers {
            let rx = rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("fitpick-worker-{id}"))
                .spawn(move || worker_loop(id, &rx))
                .map_err(|err| FitError::WorkerPool(format!("spawn worker {id}: {err}")))?;
            workers.push(handle);
        }
        info!(
            workers = options.workers,
            queue_capacity = options.queue_capacity,
            "dispatcher started"
        );
        Ok(Self {
            options,
            jobs: Some(tx),
            workers,
        })
    }

    #[must_use]
    pub const fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Run every request against `items` and collect outcomes in request order.
    pub fn run_batch(
        &self,
        items: &Arc<[RawItem]>,
        requests: Vec<SearchRequest>,
    ) -> Result<BatchReport> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| FitError::WorkerPool("dispatcher is shut down".to_string()))?;

        let started = Instant::now();
        let deadline = self.options.timeout.map(|timeout| started + timeout);
        let total = requests.len();
        let cancelled = Arc::new(AtomicBool::new(false));
        let (reply_tx, reply_rx) = unbounded();
        let mut outcomes: Vec<Option<JobOutcome>> = (0..total).map(|_| None).collect();
        let mut timed_out = false;
        let mut submitted = 0;

        for (index, request) in requests.into_iter().enumerate() {
            let job = Job {
                index,
                request,
                items: Arc::clone(items),
                cancelled: Arc::clone(&cancelled),
                reply: reply_tx.clone(),
            };
            let sent = match deadline {
                Some(deadline) => jobs.send_timeout(job, remaining(deadline)),
                None => jobs.send(job).map_err(|err| SendTimeoutError::Disconnected(err.0)),
            };
            match sent {
                Ok(()) => submitted += 1,
                Err(SendTimeoutError::Timeout(_)) => {
                    timed_out = true;
                    break;
                }
                Err(SendTimeoutError::Disconnected(_)) => {
                    return Err(FitError::WorkerPool("all workers have exited".to_string()));
                }
            }
        }
        drop(reply_tx);

        let mut received = 0;
        while !timed_out && received < submitted {
            let next = match deadline {
                Some(deadline) => reply_rx.recv_timeout(remaining(deadline)),
                None => reply_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match next {
                Ok((index, outcome)) => {
                    outcomes[index] = Some(outcome);
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => timed_out = true,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        cancelled.store(true, Ordering::Release);
        // Keep whatever finished before the deadline was noticed.
        while let Ok((index, outcome)) = reply_rx.try_recv() {
            outcomes[index] = Some(outcome);
            received += 1;
        }

        if timed_out {
            warn!(
                total,
                finished = received,
                timeout = ?self.options.timeout,
                "batch deadline passed"
            );
        }
        let lost = FitError::WorkerPool("worker exited before reporting".to_string());
        let outcomes: Vec<JobOutcome> = outcomes
            .into_iter()
            .map(|slot| match slot {
                Some(outcome) => outcome,
                None if timed_out => JobOutcome::TimedOut,
                None => JobOutcome::Failed {
                    error: lost.to_structured(),
                },
            })
            .collect();

        let report = BatchReport::new(outcomes, started.elapsed());
        info!(
            total,
            completed = report.completed,
            failed = report.failed,
            timed_out = report.timed_out,
            elapsed_ms = report.elapsed_ms,
            "batch finished"
        );
        Ok(report)
    }

    /// Stop accepting work and wait for the workers to drain.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.jobs.take());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn worker_loop(id: usize, jobs: &Receiver<Job>) {
    debug!(worker = id, "worker started");
    for job in jobs {
        if job.cancelled.load(Ordering::Acquire) {
            debug!(worker = id, job = job.index, "skipping cancelled job");
            continue;
        }
        let outcome = match search_with_stats(&job.items, &job.request) {
            Ok(outcome) => JobOutcome::Completed { outcome },
            Err(err) => JobOutcome::Failed {
                error: err.to_structured(),
            },
        };
        if job.reply.send((job.index, outcome)).is_err() {
            debug!(worker = id, job = job.index, "discarding late result");
        }
    }
    debug!(worker = id, "worker stopped");
}
