#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::sync::{
        Condvar, Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    };
    use std::sync::PoisonError;

    pub(crate) fn help_pool() -> bool {
        loom::thread::yield_now();
        true
    }

    pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use core::sync::atomic::{AtomicUsize, Ordering};
    pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};
    use core::time::Duration;

    /// Longest a waiting worker stays parked before it looks for work again.
    const PARK_TIMEOUT: Duration = Duration::from_millis(1);

    /// Lets the current worker run one other pending job while it waits.
    ///
    /// Returns `false` outside of a pool or when the pool had nothing to run.
    pub(crate) fn help_pool() -> bool {
        matches!(rayon::yield_now(), Some(rayon::Yield::Executed))
    }

    /// Blocks on `condvar` until notified or [`PARK_TIMEOUT`] elapses.
    pub(crate) fn wait<'a, T>(condvar: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
        condvar
            .wait_timeout(guard, PARK_TIMEOUT)
            .map_or_else(|poisoned| poisoned.into_inner().0, |(guard, _)| guard)
    }
}

pub(crate) use imp::*;

/// Locks `mutex`, ignoring poisoning.
///
/// Guarded values are only ever replaced whole, so a panic while holding the
/// guard cannot leave them half-written.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
