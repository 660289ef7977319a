//! Fixed-size worker pool for blocking native calls
//!
//! Saved-model runs can block inside the engine for an arbitrary duration, so
//! they are handed to a small set of dedicated threads instead of the host's
//! single control thread. The pool is sized once at bridge initialization;
//! jobs queue on a channel and run to completion — there is no cancellation.

use crate::error::{BridgeError, BridgeResult};
use crossbeam::channel::{unbounded, Sender};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded set of background threads consuming jobs from a shared queue
pub struct WorkerPool {
    job_tx: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `num_threads` workers (clamped to at least one)
    pub fn new(num_threads: usize) -> BridgeResult<Self> {
        let threads = num_threads.max(1);
        let (job_tx, job_rx) = unbounded::<Job>();

        let mut handles = Vec::with_capacity(threads);
        for i in 0..threads {
            let rx = job_rx.clone();
            let handle = thread::Builder::new()
                .name(format!("bridge-worker-{}", i))
                .spawn(move || {
                    // recv drains remaining jobs after the sender drops,
                    // then errors out and ends the thread
                    while let Ok(job) = rx.recv() {
                        job();
                    }
                })
                .map_err(|e| {
                    BridgeError::internal(format!("Failed to spawn worker thread: {}", e))
                })?;
            handles.push(handle);
        }

        Ok(Self {
            job_tx: Some(job_tx),
            handles,
        })
    }

    /// Queue a job for execution on some worker thread
    pub fn submit<F>(&self, job: F) -> BridgeResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let tx = self
            .job_tx
            .as_ref()
            .ok_or_else(|| BridgeError::internal("Worker pool is shut down"))?;
        tx.send(Box::new(job))
            .map_err(|_| BridgeError::internal("Worker pool is shut down"))
    }

    /// Number of worker threads
    pub fn thread_count(&self) -> usize {
        self.handles.len()
    }

    /// Stop accepting jobs, finish the queue and join all workers
    pub fn shutdown(&mut self) {
        self.job_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
