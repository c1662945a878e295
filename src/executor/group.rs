use crate::{
    executor::ForkJoin,
    sync::{AtomicUsize, Condvar, Mutex, Ordering, help_pool, lock, wait},
    task::{TaskPanic, run_task},
};
use std::sync::Arc;

/// Join counter of a spawn group.
///
/// Protocol:
/// - the parent calls [`enter`](Self::enter) before handing a task to the pool;
/// - the task calls [`leave`](Self::leave) exactly once with its outcome,
///   recording the first failure and then decrementing with `Release`;
/// - the parent polls [`is_drained`](Self::is_drained), an `Acquire` load, so
///   once it observes zero every child's writes happen-before its next step;
/// - a parent with nothing else to do may [`park`](Self::park) until the last
///   task leaves.
#[derive(Debug)]
pub struct JoinCounter<E> {
    pending: AtomicUsize,
    failure: Mutex<Option<E>>,
    drained: Condvar,
}

impl<E> Default for JoinCounter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> JoinCounter<E> {
    /// A counter with nothing outstanding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            failure: Mutex::new(None),
            drained: Condvar::new(),
        }
    }

    /// Registers one more outstanding task.
    pub fn enter(&self) {
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Retires one outstanding task, keeping its error if it is the first.
    pub fn leave(&self, outcome: Result<(), E>) {
        if let Err(error) = outcome {
            let mut slot = lock(&self.failure);
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        if self.pending.fetch_sub(1, Ordering::Release) == 1 {
            let _guard = lock(&self.failure);
            self.drained.notify_all();
        }
    }

    /// Whether every entered task has left.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pending.load(Ordering::Acquire) == 0
    }

    /// Blocks until the last task leaves. Outside of loom models the wait is
    /// bounded to about a millisecond, after which the caller may help again.
    ///
    /// The drain check happens under the same lock the last task takes to
    /// notify, so a wakeup cannot be missed.
    pub fn park(&self) {
        let guard = lock(&self.failure);
        if !self.is_drained() {
            drop(wait(&self.drained, guard));
        }
    }

    /// Number of tasks entered but not yet left.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    /// Removes the recorded failure, if any.
    pub fn take_failure(&self) -> Option<E> {
        lock(&self.failure).take()
    }
}

/// Spawn/sync handle given to the body of [`ForkJoin::scope`].
pub struct TaskGroup<'g, 's, E> {
    scope: Option<&'g rayon::Scope<'s>>,
    counter: Arc<JoinCounter<E>>,
}

impl<'g, 's, E> TaskGroup<'g, 's, E>
where
    E: Send + From<TaskPanic> + 's,
{
    pub(super) fn new(scope: Option<&'g rayon::Scope<'s>>, counter: Arc<JoinCounter<E>>) -> Self {
        Self { scope, counter }
    }

    /// Schedule `task` to run, possibly concurrently with the caller.
    ///
    /// In a serial context the task runs right here. A panic inside the task
    /// is recorded as a failure like any returned error.
    pub fn spawn<F>(&self, task: F)
    where
        F: FnOnce(ForkJoin) -> Result<(), E> + Send + 's,
    {
        self.counter.enter();
        match self.scope {
            None => self.counter.leave(run_task(|| task(ForkJoin::serial()))),
            Some(scope) => {
                let counter = Arc::clone(&self.counter);
                scope.spawn(move |_| counter.leave(run_task(|| task(ForkJoin::parallel()))));
            }
        }
    }

    /// Wait until every task spawned so far has finished.
    ///
    /// While waiting, the worker keeps executing other pending tasks. When the
    /// pool has none, it parks on the counter instead of spinning.
    ///
    /// # Errors
    /// The first failure among the spawned tasks since the previous sync.
    pub fn sync(&self) -> Result<(), E> {
        while !self.counter.is_drained() {
            if !help_pool() {
                self.counter.park();
            }
        }
        self.counter.take_failure().map_or(Ok(()), Err)
    }

    /// Number of spawned tasks that have not finished yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.counter.pending()
    }
}

impl<E> core::fmt::Debug for TaskGroup<'_, '_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskGroup")
            .field("parallel", &self.scope.is_some())
            .field("pending", &self.counter.pending())
            .finish()
    }
}
