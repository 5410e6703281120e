//! Bounded worker pool for scan tasks.
//!
//! Each grid point becomes one task; each task is one full domain scan. A
//! dedicated rayon pool with exactly `max_workers` threads pulls tasks lazily
//! from the grid iterator, so:
//!
//! - at most `max_workers` scans are in flight at any time
//! - grid points are generated only as workers become free
//! - the call returns once every dispatched task has finished
//!
//! Per task: dispatched → running → completed (report persisted) | aborted
//! (kernel diverged, nothing persisted) | failed (sink error). There are no
//! retries.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, error, info};

use crate::domain::{ScanDomain, ScanOutcome, ScanTask};
use crate::error::{AppError, EXIT_POOL};
use crate::kernel::PolynomialKernel;
use crate::report::ReportSink;
use crate::scan::scan;

/// How a single task ended.
#[derive(Debug, Clone)]
pub enum TaskStatus {
    Completed,
    Aborted,
    Failed(AppError),
}

/// Totals for one pool run.
#[derive(Debug, Clone, Default)]
pub struct PoolSummary {
    pub dispatched: usize,
    pub completed: usize,
    pub aborted: usize,
    pub failed: Vec<(String, AppError)>,
}

impl PoolSummary {
    fn record(mut self, id: &str, status: TaskStatus) -> Self {
        self.dispatched += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Aborted => self.aborted += 1,
            TaskStatus::Failed(err) => self.failed.push((id.to_string(), err)),
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        self.dispatched += other.dispatched;
        self.completed += other.completed;
        self.aborted += other.aborted;
        self.failed.extend(other.failed);
        self
    }

    /// Fold another run (e.g. a different order) into this one.
    pub fn absorb(&mut self, other: Self) {
        *self = std::mem::take(self).merge(other);
    }
}

/// Scan one task and persist its report.
pub fn run_task<S: ReportSink + ?Sized>(task: &ScanTask, domain: &ScanDomain, sink: &S) -> TaskStatus {
    let kernel = PolynomialKernel::new(task.order, task.coefs);
    let started = Instant::now();

    match scan(&kernel, domain) {
        ScanOutcome::Completed(report) => match sink.persist(task, &report) {
            Ok(()) => {
                debug!(
                    id = %task.id,
                    rmsd = report.rmsd,
                    max_abs_error = report.max_abs_error,
                    max_bits_error = report.max_bits_error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "task completed"
                );
                TaskStatus::Completed
            }
            Err(err) => {
                error!(id = %task.id, %err, "failed to persist report");
                TaskStatus::Failed(err)
            }
        },
        ScanOutcome::Aborted { at, value } => {
            debug!(id = %task.id, at, value, "kernel left [-1, 1]; task dropped");
            TaskStatus::Aborted
        }
    }
}

#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    max_workers: usize,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Result<Self, AppError> {
        if max_workers == 0 {
            return Err(AppError::config("Worker count must be >= 1."));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .thread_name(|i| format!("scan-worker-{i}"))
            .build()
            .map_err(|e| AppError::new(EXIT_POOL, format!("Failed to start {max_workers} worker threads: {e}")))?;
        Ok(Self { pool, max_workers })
    }

    /// Run every task to completion.
    ///
    /// `on_dispatch` sees each task as a worker pulls it. Pulls are serialized
    /// by the bridge, so the calls arrive in iterator order.
    pub fn run<I, S, D>(&self, tasks: I, domain: &ScanDomain, sink: &S, on_dispatch: D) -> PoolSummary
    where
        I: Iterator<Item = ScanTask> + Send,
        S: ReportSink + ?Sized,
        D: FnMut(&ScanTask) + Send,
    {
        info!(workers = self.max_workers, "worker pool started");
        let started = Instant::now();

        let summary = self.pool.install(|| {
            tasks
                .inspect(on_dispatch)
                .par_bridge()
                .fold(PoolSummary::default, |acc, task| {
                    let status = run_task(&task, domain, sink);
                    acc.record(&task.id, status)
                })
                .reduce(PoolSummary::default, PoolSummary::merge)
        });

        info!(
            dispatched = summary.dispatched,
            completed = summary.completed,
            aborted = summary.aborted,
            failed = summary.failed.len(),
            elapsed_s = started.elapsed().as_secs_f64(),
            "worker pool drained"
        );
        summary
    }
}
