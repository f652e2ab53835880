//! Job executor module.
//!
//! Executes relocation jobs:
//! - archive jobs are materialized into their media file first
//! - the target directory is created on demand
//! - the item is copied, hard linked or moved
//!
//! Jobs run serially or on a bounded pool of blocking workers that drain a
//! shared queue. Every job yields exactly one outcome; a failing job never
//! stops its siblings.

use crate::core::aggregator::{Aggregator, RunSummary};
use crate::core::materializer::Materializer;
use crate::core::parser::EpisodeParser;
use crate::models::config::ExecutorSettings;
use crate::models::job::{Action, Job, JobOutcome};
use crate::utils::fs;
use crate::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on parallel workers.
    pub max_workers: usize,
    /// Whether to verify checksums when a move falls back to copying.
    pub verify_checksum: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorSettings::default().into()
    }
}

impl From<ExecutorSettings> for ExecutorConfig {
    fn from(settings: ExecutorSettings) -> Self {
        Self {
            max_workers: settings.max_workers,
            verify_checksum: settings.verify_checksum,
        }
    }
}

/// How a batch of jobs is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One job at a time, in order.
    Serial,
    /// Bounded worker pool.
    Parallel,
}

/// What a single job ended up doing.
enum Placement {
    Placed,
    NoMediaInArchive,
}

/// Job executor.
#[derive(Debug, Clone)]
pub struct Executor {
    config: ExecutorConfig,
    materializer: Materializer,
}

impl Executor {
    /// Create a new executor with default configuration.
    pub fn new(parser: EpisodeParser) -> Self {
        Self::with_config(parser, ExecutorConfig::default())
    }

    /// Create a new executor with custom configuration.
    pub fn with_config(parser: EpisodeParser, config: ExecutorConfig) -> Self {
        Self {
            config,
            materializer: Materializer::new(parser),
        }
    }

    /// Execute a single job, capturing any failure in the outcome.
    pub fn execute(&self, mut job: Job) -> JobOutcome {
        match self.place(&mut job) {
            Ok(Placement::Placed) => {
                tracing::info!("{} {:?} -> {:?}", job.action, job.source, job.target);
                JobOutcome::placed(job)
            }
            Ok(Placement::NoMediaInArchive) => {
                JobOutcome::skipped(job, "archive contains no media file")
            }
            Err(e) => {
                tracing::error!("Job failed: {:?} -> {:?}: {}", job.source, job.target, e);
                JobOutcome::failed(job, e.to_string())
            }
        }
    }

    fn place(&self, job: &mut Job) -> Result<Placement> {
        if self.materializer.needs_materialize(job) && !self.materializer.materialize(job)? {
            return Ok(Placement::NoMediaInArchive);
        }

        if let Some(parent) = job.target.parent() {
            fs::create_dir_all(parent)?;
        }

        match job.action {
            Action::Copy => fs::copy_file(&job.source, &job.target)?,
            Action::Link => fs::link_file(&job.source, &job.target)?,
            Action::Move => fs::move_file(&job.source, &job.target, self.config.verify_checksum)?,
        }

        Ok(Placement::Placed)
    }

    /// Run jobs one at a time in order, off the async runtime.
    pub async fn run_serial<F>(&self, jobs: Vec<Job>, on_outcome: F) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        self.run_pool(jobs, 1, on_outcome).await
    }

    /// Run jobs on a pool of `min(max_workers, jobs)` blocking workers.
    pub async fn run_parallel<F>(&self, jobs: Vec<Job>, on_outcome: F) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        self.run_pool(jobs, self.config.max_workers, on_outcome).await
    }

    /// Workers pop jobs from a shared queue until it is empty and send one
    /// outcome per job back over a channel. Outcomes are aggregated here, on
    /// the calling task only; `on_outcome` is invoked once per outcome in
    /// arrival order. With a single worker that is job order.
    async fn run_pool<F>(
        &self,
        jobs: Vec<Job>,
        max_workers: usize,
        mut on_outcome: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        let total = jobs.len();
        let mut aggregator = Aggregator::new();
        if total == 0 {
            return Ok(aggregator.finish());
        }

        let worker_count = max_workers.clamp(1, total);
        tracing::info!("Executing {} jobs on {} workers", total, worker_count);

        let queue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let executor = self.clone();
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            workers.push(tokio::task::spawn_blocking(move || {
                executor.work(worker_id, &queue, &tx)
            }));
        }
        drop(tx);

        while aggregator.processed() < total {
            let Some(outcome) = rx.recv().await else {
                break;
            };
            on_outcome(&outcome);
            aggregator.record(outcome);
        }

        // Wait for every worker to drain and exit before reporting
        let mut executed = 0usize;
        for worker in workers {
            executed += worker
                .await
                .map_err(|e| crate::Error::Execute(format!("Worker panicked: {}", e)))?;
        }

        let received = aggregator.processed();
        if received != total || executed != total {
            return Err(crate::Error::Execute(format!(
                "Expected {} outcomes, received {} ({} executed)",
                total, received, executed
            )));
        }

        Ok(aggregator.finish())
    }

    /// Worker loop: take jobs until the queue is empty.
    fn work(
        &self,
        worker_id: usize,
        queue: &Mutex<VecDeque<Job>>,
        tx: &mpsc::UnboundedSender<JobOutcome>,
    ) -> usize {
        let mut executed = 0;
        loop {
            let next = queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            let Some(job) = next else {
                break;
            };

            let outcome = self.execute(job);
            executed += 1;
            if tx.send(outcome).is_err() {
                tracing::warn!("Worker {}: outcome receiver dropped", worker_id);
                break;
            }
        }
        tracing::debug!("Worker {} finished after {} jobs", worker_id, executed);
        executed
    }

    /// Run jobs in the given mode.
    pub async fn run<F>(&self, jobs: Vec<Job>, mode: ExecutionMode, on_outcome: F) -> Result<RunSummary>
    where
        F: FnMut(&JobOutcome),
    {
        match mode {
            ExecutionMode::Serial => self.run_serial(jobs, on_outcome).await,
            ExecutionMode::Parallel => self.run_parallel(jobs, on_outcome).await,
        }
    }
}
