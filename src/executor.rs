mod execute;
mod group;
mod setup;

/// Error returned by [`Executor::new`] when the worker pool cannot be built.
pub use crate::executor::setup::ExecutorSetupError;
pub use crate::executor::group::{JoinCounter, TaskGroup};
use crate::{
    config::{ExecutionMode, ExecutorConfig},
    task::{TaskPanic, run_task},
};
use derive_more::Debug;
use std::{
    panic::{AssertUnwindSafe, catch_unwind, resume_unwind},
    sync::Arc,
};

/// Fixed-size worker pool running fork-join task trees.
///
/// The pool is a work-stealing rayon pool of `config.workers` threads. Which
/// worker runs which leaf is unspecified. In [`ExecutionMode::Serial`] no
/// threads are started and every task runs inline on the caller's thread.
///
/// The executor keeps no state between calls apart from the pool itself.
#[must_use]
#[derive(Debug)]
pub struct Executor {
    config: ExecutorConfig,
    #[debug(skip)]
    pool: Option<rayon::ThreadPool>,
}

impl Executor {
    /// Build an executor, starting the worker threads in parallel mode.
    ///
    /// # Errors
    /// If the operating system refuses to spawn the worker threads.
    pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorSetupError> {
        let pool = setup::build_pool(&config)?;
        Ok(Self { config, pool })
    }

    /// An executor that runs everything on the calling thread.
    pub fn serial() -> Self {
        Self {
            config: ExecutorConfig::serial(),
            pool: None,
        }
    }

    /// Configuration this executor was built from.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Serial or parallel.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.config.mode
    }

    /// Number of threads tasks may run on.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool
            .as_ref()
            .map_or(1, rayon::ThreadPool::current_num_threads)
    }

    /// Run `op` as the root task of a fork-join tree.
    ///
    /// A panic anywhere in the tree is reported as `E::from(TaskPanic)` once
    /// every sibling of the panicking task has finished; no worker is lost and
    /// the executor stays usable.
    ///
    /// # Errors
    /// Whatever `op` returns, or the captured panic.
    pub fn install<R, E, F>(&self, op: F) -> Result<R, E>
    where
        F: FnOnce(ForkJoin) -> Result<R, E> + Send,
        R: Send,
        E: Send + From<TaskPanic>,
    {
        match &self.pool {
            Some(pool) => pool.install(|| run_task(|| op(ForkJoin::parallel()))),
            None => run_task(|| op(ForkJoin::serial())),
        }
    }
}

/// Handle to the fork-join context of the running task.
///
/// Passed to every task body. It is `Copy`: forking from a child task uses the
/// handle that child received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForkJoin {
    mode: ExecutionMode,
}

impl ForkJoin {
    /// A context whose forks run one after the other on the current thread.
    #[must_use]
    pub const fn serial() -> Self {
        Self {
            mode: ExecutionMode::Serial,
        }
    }

    pub(crate) const fn parallel() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
        }
    }

    /// Serial or parallel.
    #[must_use]
    pub const fn mode(self) -> ExecutionMode {
        self.mode
    }

    /// Run `left` and `right`, potentially in parallel, and wait for both.
    ///
    /// This is spawn-left, run-right, sync. If either side panics the other
    /// still runs to completion before the panic is resumed.
    pub fn join<A, B, RA, RB>(self, left: A, right: B) -> (RA, RB)
    where
        A: FnOnce(Self) -> RA + Send,
        B: FnOnce(Self) -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match self.mode {
            ExecutionMode::Parallel => rayon::join(|| left(self), || right(self)),
            ExecutionMode::Serial => {
                let left = catch_unwind(AssertUnwindSafe(|| left(self)));
                let right = right(self);
                match left {
                    Ok(left) => (left, right),
                    Err(payload) => resume_unwind(payload),
                }
            }
        }
    }

    /// Fallible [`join`](Self::join): both sides always run to completion,
    /// then the left error wins over the right one.
    ///
    /// # Errors
    /// The first failing side's error.
    pub fn try_join<A, B, RA, RB, E>(self, left: A, right: B) -> Result<(RA, RB), E>
    where
        A: FnOnce(Self) -> Result<RA, E> + Send,
        B: FnOnce(Self) -> Result<RB, E> + Send,
        RA: Send,
        RB: Send,
        E: Send,
    {
        let (left, right) = self.join(left, right);
        Ok((left?, right?))
    }

    /// Open a spawn group: tasks spawned through the [`TaskGroup`] may run
    /// concurrently with the rest of `op`, [`TaskGroup::sync`] waits for them.
    ///
    /// Leaving the scope is an implicit final sync. A failure recorded by a
    /// spawned task and not yet reported by `sync` is returned here, unless `op`
    /// itself failed.
    ///
    /// # Errors
    /// The error of `op`, otherwise the first failure of a spawned task.
    pub fn scope<'s, R, E, F>(self, op: F) -> Result<R, E>
    where
        F: FnOnce(&TaskGroup<'_, 's, E>) -> Result<R, E> + Send,
        R: Send,
        E: Send + From<TaskPanic> + 's,
    {
        let counter = Arc::new(JoinCounter::new());
        let outcome = match self.mode {
            ExecutionMode::Parallel => rayon::scope(|scope| {
                op(&TaskGroup::new(Some(scope), Arc::clone(&counter)))
            }),
            ExecutionMode::Serial => op(&TaskGroup::new(None, Arc::clone(&counter))),
        };
        let unreported = counter.take_failure();
        match (outcome, unreported) {
            (Err(error), _) | (Ok(_), Some(error)) => Err(error),
            (Ok(value), None) => Ok(value),
        }
    }
}
