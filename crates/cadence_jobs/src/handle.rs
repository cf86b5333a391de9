//! Frame job handles.
//!
//! A handle is the join side of work submitted to the [`JobPool`]. The
//! contract managers rely on: spawn during one phase hook, call
//! `complete` during a later hook of the same frame. Completing twice —
//! e.g. once from a late-update cleanup and again from the destroy pass —
//! returns `None` the second time instead of failing.

use std::sync::Arc;

use crossbeam::channel::{Receiver, bounded, unbounded};
use tracing::warn;

use crate::pool::JobPool;

/// The join side of one background computation.
#[derive(Debug)]
pub struct JobHandle<T> {
    receiver: Receiver<T>,
    completed: bool,
}

impl<T> JobHandle<T> {
    /// Block until the job finishes and return its result.
    ///
    /// Returns `None` if the handle was already completed, or if the worker
    /// died before delivering a result (logged, not surfaced).
    pub fn complete(&mut self) -> Option<T> {
        if self.completed {
            return None;
        }
        self.completed = true;

        match self.receiver.recv() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("job finished without a result");
                None
            }
        }
    }

    /// Returns `true` if [`JobHandle::complete`] has already been called.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

/// The join side of a parallel map, reassembled in input order.
#[derive(Debug)]
pub struct JobBatch<U> {
    receiver: Receiver<(usize, Vec<U>)>,
    pending: usize,
    completed: bool,
}

impl<U> JobBatch<U> {
    /// Block until every chunk finishes and return the mapped items in
    /// input order.
    ///
    /// Returns `None` if the batch was already completed, or if a worker
    /// died before delivering its chunk (logged, not surfaced).
    pub fn complete(&mut self) -> Option<Vec<U>> {
        if self.completed {
            return None;
        }
        self.completed = true;

        let mut chunks: Vec<(usize, Vec<U>)> = Vec::with_capacity(self.pending);
        for _ in 0..self.pending {
            match self.receiver.recv() {
                Ok(chunk) => chunks.push(chunk),
                Err(_) => {
                    warn!("batch chunk lost before completion");
                    return None;
                }
            }
        }

        chunks.sort_by_key(|(index, _)| *index);
        Some(chunks.into_iter().flat_map(|(_, items)| items).collect())
    }

    /// Returns `true` if [`JobBatch::complete`] has already been called.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

impl JobPool {
    /// Run one computation on a worker and return its handle.
    pub fn spawn<T, F>(&self, task: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = bounded(1);
        self.execute(move || {
            let _ = sender.send(task());
        });

        JobHandle {
            receiver,
            completed: false,
        }
    }

    /// Map `task` over `items` in parallel, `chunk_size` items per job.
    ///
    /// The batch owns its input for the duration of the work; results come
    /// back through [`JobBatch::complete`] in input order.
    pub fn scatter<T, U, F>(&self, mut items: Vec<T>, chunk_size: usize, task: F) -> JobBatch<U>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let task = Arc::new(task);
        let (sender, receiver) = unbounded();
        let chunk_size = chunk_size.max(1);

        let mut pending = 0;
        let mut chunk_index = 0;
        while !items.is_empty() {
            let take = chunk_size.min(items.len());
            let chunk: Vec<T> = items.drain(..take).collect();
            let sender = sender.clone();
            let task = Arc::clone(&task);
            let index = chunk_index;

            self.execute(move || {
                let mapped: Vec<U> = chunk.iter().map(|item| task(item)).collect();
                let _ = sender.send((index, mapped));
            });

            chunk_index += 1;
            pending += 1;
        }

        JobBatch {
            receiver,
            pending,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_complete() {
        let pool = JobPool::new(2);
        let mut handle = pool.spawn(|| 6 * 7);
        assert_eq!(handle.complete(), Some(42));
    }

    #[test]
    fn test_complete_twice_returns_none() {
        let pool = JobPool::new(2);
        let mut handle = pool.spawn(|| 1);
        assert_eq!(handle.complete(), Some(1));
        assert!(handle.is_completed());
        assert_eq!(handle.complete(), None, "second completion is a tolerated no-op");
    }

    #[test]
    fn test_scatter_preserves_input_order() {
        let pool = JobPool::new(4);
        let items: Vec<u64> = (0..100).collect();
        let mut batch = pool.scatter(items, 7, |n| n * n);

        let squares = batch.complete().unwrap();
        let expected: Vec<u64> = (0..100).map(|n| n * n).collect();
        assert_eq!(squares, expected);
    }

    #[test]
    fn test_scatter_empty_input() {
        let pool = JobPool::new(2);
        let mut batch = pool.scatter(Vec::<u32>::new(), 8, |n| n + 1);
        assert_eq!(batch.complete(), Some(Vec::new()));
    }

    #[test]
    fn test_scatter_complete_twice_returns_none() {
        let pool = JobPool::new(2);
        let mut batch = pool.scatter(vec![1, 2, 3], 2, |n| n * 10);
        assert_eq!(batch.complete(), Some(vec![10, 20, 30]));
        assert_eq!(batch.complete(), None);
    }

    #[test]
    fn test_completion_after_pool_shutdown() {
        let mut pool = JobPool::new(2);
        let mut handle = pool.spawn(|| "done");
        pool.shutdown();
        // The job ran before the workers drained their terminate messages.
        assert_eq!(handle.complete(), Some("done"));
    }
}
