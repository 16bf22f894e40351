// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whatever actually runs the bands.  The producer only needs
//! something that takes a batch of tasks and blocks until each of
//! them has either a result or a failure; that is the `JobService`
//! trait.  Two local services are provided: one that runs the bands in
//! order on the calling thread, and a pool of scoped worker threads
//! that pull bands off a shared queue until it runs dry.

extern crate crossbeam;

use error::TaskFailure;
use num_cpus;
use solver::solve_band;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use task::{BandResult, BandTask, TaskOutcome};

/// Runs a batch of independent bands.  The outcomes may come back in
/// any order; each carries the rows it belongs to.
pub trait JobService {
    /// Run every task and block until all of them are done.
    fn submit(&self, tasks: Vec<BandTask>) -> Vec<TaskOutcome>;
}

/// Any function from tasks to outcomes will do.
impl<F> JobService for F
where
    F: Fn(Vec<BandTask>) -> Vec<TaskOutcome>,
{
    fn submit(&self, tasks: Vec<BandTask>) -> Vec<TaskOutcome> {
        self(tasks)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "band solver panicked".to_string()
    }
}

fn run_with<F>(task: &BandTask, solve: &F) -> TaskOutcome
where
    F: Fn(&BandTask) -> BandResult,
{
    panic::catch_unwind(AssertUnwindSafe(|| solve(task)))
        .map_err(|payload| TaskFailure::new(task.rows(), panic_message(&*payload)))
}

/// Solve one band, turning a panic into that band's failure.
pub fn run_task(task: &BandTask) -> TaskOutcome {
    run_with(task, &solve_band)
}

/// Runs every band on the calling thread, in order.
#[derive(Copy, Clone, Debug, Default)]
pub struct SerialExecutor;

impl SerialExecutor {
    fn submit_with<F>(&self, tasks: Vec<BandTask>, solve: &F) -> Vec<TaskOutcome>
    where
        F: Fn(&BandTask) -> BandResult,
    {
        tasks.iter().map(|task| run_with(task, solve)).collect()
    }
}

impl JobService for SerialExecutor {
    fn submit(&self, tasks: Vec<BandTask>) -> Vec<TaskOutcome> {
        self.submit_with(tasks, &solve_band)
    }
}

/// A fixed number of scoped worker threads sharing one queue of
/// bands.  Outcomes are collected in the order the bands finish.
#[derive(Copy, Clone, Debug)]
pub struct ThreadedExecutor {
    threads: usize,
}

impl ThreadedExecutor {
    /// A pool of `threads` workers; asking for none gets one.
    pub fn new(threads: usize) -> Self {
        ThreadedExecutor {
            threads: threads.max(1),
        }
    }

    /// The number of workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    fn submit_with<F>(&self, tasks: Vec<BandTask>, solve: &F) -> Vec<TaskOutcome>
    where
        F: Fn(&BandTask) -> BandResult + Sync,
    {
        let workers = self.threads.min(tasks.len());
        debug!("Submitting {} bands to {} workers", tasks.len(), workers);
        let outcomes = Mutex::new(Vec::with_capacity(tasks.len()));
        let queue = Arc::new(Mutex::new(tasks.into_iter()));

        let pool = crossbeam::scope(|spawner| {
            for _ in 0..workers {
                let queue = queue.clone();
                let outcomes = &outcomes;
                spawner.spawn(move |_| loop {
                    let task = {
                        queue
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .next()
                    };
                    match task {
                        Some(task) => {
                            let outcome = run_with(&task, solve);
                            outcomes
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .push(outcome);
                        }
                        None => {
                            break;
                        }
                    }
                });
            }
        });
        if pool.is_err() {
            error!("A worker thread died outside of a band; its bands will be reported missing");
        }

        outcomes
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ThreadedExecutor {
    /// One worker per CPU.
    fn default() -> Self {
        ThreadedExecutor::new(num_cpus::get())
    }
}

impl JobService for ThreadedExecutor {
    fn submit(&self, tasks: Vec<BandTask>) -> Vec<TaskOutcome> {
        self.submit_with(tasks, &solve_band)
    }
}
