//! Order-preserving worker pool.
//!
//! Items are pulled on the calling thread, grouped into batches and handed to
//! worker threads. Results come back in any order and are emitted on the
//! calling thread in the order the items were pulled.

use crate::constants::{MAX_WORKERS_PER_CPU, POOL_BATCHES_PER_WORKER};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, warn};

type Job<T> = (usize, Vec<T>);
type Done<R> = (usize, Result<Vec<R>>);

/// Fan-out of independent work items across threads.
#[derive(Debug, Clone, Copy)]
pub struct OrderedPool {
    workers: usize,
    batch_size: usize,
}

impl OrderedPool {
    /// Pool with `workers` threads receiving `batch_size` items at a time.
    ///
    /// The worker count is capped at [`MAX_WORKERS_PER_CPU`] threads per
    /// available CPU.
    pub fn new(workers: usize, batch_size: usize) -> Self {
        let limit = max_workers();
        if workers > limit {
            warn!("Limiting {workers} requested workers to {limit}");
        }

        Self {
            workers: workers.clamp(1, limit),
            batch_size: batch_size.max(1),
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Pull items with `next` until it yields `None`, transform each with
    /// `work`, and pass every result to `emit` in pull order.
    ///
    /// `state` is lent to `next` and `emit` in turn, both always on the calling
    /// thread. The first error stops the run; results pulled after it are
    /// dropped. A single worker runs everything inline.
    pub fn run<S, T, R, N, W, E>(&self, state: &mut S, mut next: N, work: W, mut emit: E) -> Result<()>
    where
        T: Send,
        R: Send,
        N: FnMut(&mut S) -> Result<Option<T>>,
        W: Fn(T) -> Result<R> + Sync,
        E: FnMut(&mut S, R) -> Result<()>,
    {
        if self.workers == 1 {
            while let Some(item) = next(state)? {
                let result = work(item)?;
                emit(state, result)?;
            }
            return Ok(());
        }

        debug!(
            "Starting {} workers with batches of {}",
            self.workers, self.batch_size
        );

        let (job_tx, job_rx) = mpsc::channel::<Job<T>>();
        let (done_tx, done_rx) = mpsc::channel::<Done<R>>();
        let jobs = Mutex::new(job_rx);
        let work = &work;

        thread::scope(|scope| {
            for id in 0..self.workers {
                let jobs = &jobs;
                let done = done_tx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("xzar-worker-{id}"))
                    .spawn_scoped(scope, move || {
                        loop {
                            let job = match jobs.lock() {
                                Ok(guard) => guard.recv(),
                                Err(_) => break,
                            };
                            let Ok((seq, items)) = job else { break };

                            let output = items.into_iter().map(work).collect::<Result<Vec<_>>>();
                            if done.send((seq, output)).is_err() {
                                break;
                            }
                        }
                    });
                spawned.map_err(|e| Error::WorkerPool {
                    reason: format!("failed to start worker thread: {e}"),
                })?;
            }
            drop(done_tx);

            // Dropping the job sender on return lets idle workers exit.
            self.drive(state, &mut next, &mut emit, job_tx, &done_rx)
        })
    }

    fn drive<S, T, R, N, E>(
        &self,
        state: &mut S,
        next: &mut N,
        emit: &mut E,
        jobs: Sender<Job<T>>,
        done: &Receiver<Done<R>>,
    ) -> Result<()>
    where
        N: FnMut(&mut S) -> Result<Option<T>>,
        E: FnMut(&mut S, R) -> Result<()>,
    {
        let max_in_flight = self.workers * POOL_BATCHES_PER_WORKER;
        let mut next_seq = 0;
        let mut next_emit = 0;
        let mut finished: BTreeMap<usize, Vec<R>> = BTreeMap::new();
        let mut exhausted = false;

        loop {
            while !exhausted && next_seq - next_emit < max_in_flight {
                let batch = self.fill(state, next)?;
                if batch.is_empty() {
                    exhausted = true;
                    break;
                }
                jobs.send((next_seq, batch)).map_err(|_| Error::WorkerPool {
                    reason: "all workers stopped".to_string(),
                })?;
                next_seq += 1;
            }

            if next_emit == next_seq {
                return Ok(());
            }

            let (seq, output) = done.recv().map_err(|_| Error::WorkerPool {
                reason: "workers exited before finishing their batches".to_string(),
            })?;
            finished.insert(seq, output?);

            while let Some(results) = finished.remove(&next_emit) {
                for result in results {
                    emit(state, result)?;
                }
                next_emit += 1;
            }
        }
    }

    fn fill<S, T, N>(&self, state: &mut S, next: &mut N) -> Result<Vec<T>>
    where
        N: FnMut(&mut S) -> Result<Option<T>>,
    {
        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match next(state)? {
                Some(item) => batch.push(item),
                None => break,
            }
        }
        Ok(batch)
    }
}

fn max_workers() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get) * MAX_WORKERS_PER_CPU
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Numbers {
        remaining: std::ops::Range<u64>,
        out: Vec<u64>,
    }

    fn run(pool: OrderedPool, count: u64) -> Result<Vec<u64>> {
        let mut state = Numbers {
            remaining: 0..count,
            out: Vec::new(),
        };
        pool.run(
            &mut state,
            |s| Ok(s.remaining.next()),
            |n| {
                // Later items finish first.
                thread::sleep(Duration::from_millis((count - n) % 5));
                Ok(n * 10)
            },
            |s, r| {
                s.out.push(r);
                Ok(())
            },
        )?;
        Ok(state.out)
    }

    #[test]
    fn test_results_keep_pull_order() {
        let expected: Vec<u64> = (0..50).map(|n| n * 10).collect();
        for workers in [1, 2, 4] {
            for batch_size in [1, 3] {
                let out = run(OrderedPool::new(workers, batch_size), 50).unwrap();
                assert_eq!(out, expected, "workers={workers} batch={batch_size}");
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(run(OrderedPool::new(4, 2), 0).unwrap().is_empty());
    }

    #[test]
    fn test_zero_workers_means_one() {
        assert_eq!(OrderedPool::new(0, 0).workers(), 1);
    }

    #[test]
    fn test_worker_count_is_capped() {
        let pool = OrderedPool::new(100_000, 1);
        assert_eq!(pool.workers(), max_workers());
        assert_eq!(run(pool, 20).unwrap(), (0..20).map(|n| n * 10).collect::<Vec<_>>());
    }

    #[test]
    fn test_work_error_stops_run() {
        let mut emitted = Vec::new();
        let mut items = 0..20;
        let result = OrderedPool::new(3, 2).run(
            &mut emitted,
            |_| Ok(items.next()),
            |n| {
                if n == 7 {
                    Err(Error::Backend {
                        reason: "boom".to_string(),
                    })
                } else {
                    Ok(n)
                }
            },
            |out: &mut Vec<i32>, n| {
                out.push(n);
                Ok(())
            },
        );

        assert!(matches!(result, Err(Error::Backend { .. })));
        assert!(emitted.iter().all(|&n| n < 7));
    }

    #[test]
    fn test_emit_error_stops_run() {
        let mut state = Numbers {
            remaining: 0..10,
            out: Vec::new(),
        };
        let result = OrderedPool::new(2, 1).run(
            &mut state,
            |s| Ok(s.remaining.next()),
            Ok,
            |_, _| Err(Error::BrokenPipe),
        );
        assert!(matches!(result, Err(Error::BrokenPipe)));
    }
}
