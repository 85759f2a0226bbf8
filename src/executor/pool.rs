//! Bounded worker pool for per-file transitions
//!
//! Per-file transitions touch disjoint source/backup/versioning paths, so
//! they can run concurrently. Dispatcher + per-worker inbox design:
//! - single-consumer upstream `mpsc::Receiver` (dispatcher)
//! - per-worker `mpsc` inbox channels
//! - explicit sender drop on shutdown before awaiting workers
//!
//! Outcomes are collected with their enumeration index and re-sorted, so the
//! final report matches a sequential run file for file.

use crate::executor::sync_one;
use crate::scanner::list_candidates;
use crate::types::{CandidateFile, RunReport, SyncError, SyncOutcome};
use crate::ui::EventSink;
use crate::Config;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use std::sync::Arc;
use std::time::SystemTime;

/// Work item accepted by the sync pool
#[derive(Debug, Clone)]
pub struct SyncJob {
    /// Position in the enumeration snapshot
    pub index: usize,
    pub candidate: CandidateFile,
}

/// Run one synchronization pass across a bounded worker pool
///
/// Behaves exactly like the sequential `run_sync` except that per-file
/// transitions execute concurrently; one file's failure never cancels or
/// blocks the others.
pub fn run_sync_parallel(
    config: &Config,
    sink: Arc<dyn EventSink>,
) -> Result<RunReport, SyncError> {
    let candidates = list_candidates(&config.source)?;
    super::prepare_directories(config)?;

    let now = SystemTime::now();
    let pool = SyncPool::new(config.threads, 32, Arc::new(config.clone()), sink, now)?;

    for (index, candidate) in candidates.into_iter().enumerate() {
        pool.enqueue(SyncJob { index, candidate })?;
    }

    let mut indexed = pool.close_and_wait()?;
    indexed.sort_by_key(|(index, _)| *index);

    let mut report = RunReport::new();
    for (_, outcome) in indexed {
        report.add_outcome(outcome);
    }
    Ok(report)
}

/// Dispatcher + worker pool over bounded channels
struct SyncPool {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<SyncJob>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    worker_handles: Vec<JoinHandle<()>>,
    outcomes: Arc<Mutex<Vec<(usize, SyncOutcome)>>>,
}

impl SyncPool {
    fn new(
        worker_count: usize,
        queue_capacity: usize,
        config: Arc<Config>,
        sink: Arc<dyn EventSink>,
        now: SystemTime,
    ) -> Result<Self, SyncError> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_all()
            .build()
            .map_err(|e| SyncError::Config(format!("failed to start worker runtime: {}", e)))?;

        let outcomes: Arc<Mutex<Vec<(usize, SyncOutcome)>>> = Arc::new(Mutex::new(Vec::new()));
        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<SyncJob>(capacity);

        let mut worker_txs = Vec::with_capacity(workers);
        let mut worker_handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (worker_tx, worker_rx) = mpsc::channel::<SyncJob>(capacity);
            worker_txs.push(worker_tx);
            worker_handles.push(handle.spawn(worker_loop(
                worker_rx,
                Arc::clone(&config),
                Arc::clone(&sink),
                now,
                Arc::clone(&outcomes),
            )));
        }

        let dispatcher_handle = handle.spawn(dispatcher_loop(enqueue_rx, worker_txs));

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            dispatcher_handle: Some(dispatcher_handle),
            worker_handles,
            outcomes,
        })
    }

    /// Enqueue a job into the upstream dispatcher queue
    fn enqueue(&self, job: SyncJob) -> Result<(), SyncError> {
        let sender = self.enqueue_tx.as_ref().ok_or_else(|| {
            SyncError::InvalidArgument("sync pool queue is already closed".to_string())
        })?;

        self.runtime.block_on(async {
            sender.send(job).await.map_err(|_| {
                SyncError::InvalidArgument("sync pool queue receiver is closed".to_string())
            })
        })
    }

    /// Close queue input and wait for dispatcher/workers to exit cleanly
    fn close_and_wait(mut self) -> Result<Vec<(usize, SyncOutcome)>, SyncError> {
        self.enqueue_tx.take();

        let dispatcher = self.dispatcher_handle.take();
        let workers = std::mem::take(&mut self.worker_handles);
        let outcomes = Arc::clone(&self.outcomes);

        self.runtime.block_on(async move {
            if let Some(handle) = dispatcher {
                handle.await.map_err(map_join_error)?;
            }
            for handle in workers {
                handle.await.map_err(map_join_error)?;
            }
            Ok(outcomes.lock().await.clone())
        })
    }
}

async fn dispatcher_loop(
    mut enqueue_rx: mpsc::Receiver<SyncJob>,
    worker_txs: Vec<mpsc::Sender<SyncJob>>,
) {
    let mut next_worker = 0usize;
    let worker_len = worker_txs.len();

    while let Some(job) = enqueue_rx.recv().await {
        if worker_len == 0 {
            break;
        }

        let target = next_worker % worker_len;
        if worker_txs[target].send(job).await.is_ok() {
            next_worker = (next_worker + 1) % worker_len;
        }
    }
    // worker_txs are dropped here, which closes worker inboxes.
}

async fn worker_loop(
    mut worker_rx: mpsc::Receiver<SyncJob>,
    config: Arc<Config>,
    sink: Arc<dyn EventSink>,
    now: SystemTime,
    outcomes: Arc<Mutex<Vec<(usize, SyncOutcome)>>>,
) {
    while let Some(job) = worker_rx.recv().await {
        let outcome = sync_one(&config, &job.candidate, now);
        sink.record(&outcome);
        outcomes.lock().await.push((job.index, outcome));
    }
}

fn map_join_error(error: tokio::task::JoinError) -> SyncError {
    SyncError::InvalidArgument(format!("sync pool task failed: {}", error))
}
