//! Worker-thread pool.
//!
//! Workers pull boxed jobs off a shared channel until told to terminate.
//! The pool never outlives a frame's needs implicitly — shutdown is
//! explicit (or on drop) and joins every worker.

use std::thread;

use crossbeam::channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Terminate,
}

/// A fixed-size pool of worker threads executing submitted jobs.
pub struct JobPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Message>>,
}

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, receiver: Receiver<Message>) -> Self {
        let thread = thread::spawn(move || {
            while let Ok(message) = receiver.recv() {
                match message {
                    Message::Run(job) => job(),
                    Message::Terminate => break,
                }
            }
        });

        Self {
            id,
            thread: Some(thread),
        }
    }
}

impl JobPool {
    /// Create a pool with the given number of workers (at least one).
    #[must_use]
    pub fn new(worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (sender, receiver) = unbounded();

        let workers = (0..worker_count)
            .map(|id| Worker::new(id, receiver.clone()))
            .collect();

        debug!(worker_count, "job pool started");

        Self {
            workers,
            sender: Some(sender),
        }
    }

    /// Returns the number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Submit a job for execution on a worker thread.
    ///
    /// After shutdown there are no workers left; the job still runs, on the
    /// caller's thread, so submitted work is never silently lost.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        match &self.sender {
            Some(sender) => {
                if sender.send(Message::Run(Box::new(job))).is_err() {
                    warn!("job channel closed, running job on caller thread");
                }
            }
            None => {
                warn!("job submitted after pool shutdown, running on caller thread");
                job();
            }
        }
    }

    /// Terminate and join every worker.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub fn shutdown(&mut self) {
        let Some(sender) = self.sender.take() else {
            return;
        };

        for _ in &self.workers {
            // Workers that already exited leave the message undelivered.
            let _ = sender.send(Message::Terminate);
        }
        drop(sender);

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take()
                && thread.join().is_err()
            {
                warn!(worker = worker.id, "worker thread panicked");
            }
        }

        debug!("job pool shut down");
    }
}

impl Drop for JobPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for JobPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobPool")
            .field("workers", &self.workers.len())
            .field("running", &self.sender.is_some())
            .finish()
    }
}
