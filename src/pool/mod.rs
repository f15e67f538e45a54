//! Fixed-size worker thread pool
//!
//! A small pool of native threads consuming a FIFO task queue. Submitting a
//! task returns a [`TaskHandle`] that the caller can wait on for the task's
//! result. Shutdown is cooperative: workers drain whatever is already queued
//! and then exit; dropping the pool shuts it down and joins every worker.
//!
//! There are no priorities and no cancellation of running tasks.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Errors surfaced by pool operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has begun shutdown; no further tasks are accepted.
    #[error("thread pool is stopped")]
    Stopped,

    /// The task panicked while running.
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// The task was dropped without running (pool torn down first).
    #[error("task was dropped before completion")]
    Canceled,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Completion handle for a submitted task.
///
/// [`TaskHandle::wait`] blocks until the task has run and yields its result,
/// surfacing a panic inside the task as [`PoolError::TaskPanicked`].
pub struct TaskHandle<T> {
    receiver: Receiver<Result<T, PoolError>>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task completes.
    pub fn wait(self) -> Result<T, PoolError> {
        self.receiver.recv().unwrap_or(Err(PoolError::Canceled))
    }
}

/// A fixed-size pool of worker threads.
///
/// The worker count is fixed at construction and stays invariant until the
/// pool is dropped.
pub struct ThreadPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Creates a pool with `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = unbounded::<Job>();

        let workers = (0..size)
            .map(|_| {
                let receiver: Receiver<Job> = receiver.clone();
                thread::spawn(move || {
                    // recv() fails only when the sender is gone and the
                    // queue is drained, which is exactly the exit condition.
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Enqueues a task, returning a handle for its result.
    ///
    /// Fails with [`PoolError::Stopped`] once [`ThreadPool::shutdown`] has
    /// been called.
    pub fn submit<F, T>(&self, task: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(PoolError::Stopped)?;
        let (result_tx, result_rx) = bounded(1);

        let job: Job = Box::new(move || {
            let outcome = match catch_unwind(AssertUnwindSafe(task)) {
                Ok(value) => Ok(value),
                Err(panic) => Err(PoolError::TaskPanicked(panic_message(&panic))),
            };
            // The handle may have been dropped; nothing to do then.
            let _ = result_tx.send(outcome);
        });

        sender.send(job).map_err(|_| PoolError::Stopped)?;
        Ok(TaskHandle {
            receiver: result_rx,
        })
    }

    /// Signals shutdown and joins every worker.
    ///
    /// Queued tasks still run to completion; new submissions fail with
    /// [`PoolError::Stopped`].
    pub fn shutdown(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
