//! Fork-join parallel-for and parallel-reduce with associative reducers.
//!
//! This crate provides a small fork-join layer over a fixed-size
//! work-stealing pool and a set of numeric kernels built only from it:
//! - A [`ForkJoin`] context offers `join`, spawn/sync groups
//!   ([`ForkJoin::scope`]), `parallel_for` by balanced recursive bisection down
//!   to a grain size, and `parallel_reduce` into a [`Reducer`].
//! - Reducers are monoids (`identity`, `accumulate`, `combine`). Each leaf
//!   folds into a private view and views are merged at joins, so results do
//!   not depend on scheduling, only on `combine` being associative.
//! - Kernels: max/min with index, sums, an integration sample sum, parallel
//!   fill and collect, quicksort with a last-element pivot, and Gaussian
//!   elimination without pivoting.
//!
//! Failures propagate through the nearest sync once sibling tasks have
//! finished; panics are captured at [`Executor::install`] and spawn
//! boundaries and surface as [`Error::TaskPanicked`].
//!
//! Quick start:
//! 1. Build an [`Executor`] from an [`ExecutorConfig`] (4 parallel workers by
//!    default, or [`ExecutionMode::Serial`] as a timing baseline).
//! 2. Call a kernel from [`kernels`] with a caller-owned buffer and a [`Grain`].
//! 3. For custom loops, use [`Executor::install`] and the [`ForkJoin`] handle.
//!
//! [`ForkJoin`]: executor::ForkJoin
//! [`ForkJoin::scope`]: executor::ForkJoin::scope
//! [`Reducer`]: reducer::Reducer
//! [`Executor`]: executor::Executor
//! [`Executor::install`]: executor::Executor::install
//! [`ExecutorConfig`]: config::ExecutorConfig
//! [`ExecutionMode::Serial`]: config::ExecutionMode::Serial
//! [`Grain`]: config::Grain
//! [`Error::TaskPanicked`]: error::Error::TaskPanicked

/// Executor, grain and solver configuration.
pub mod config;
/// Crate error type.
pub mod error;
/// Worker pool and the fork-join primitives.
///
/// Contains the [`Executor`](executor::Executor) pool wrapper, the
/// [`ForkJoin`](executor::ForkJoin) handle with `join`, spawn groups and the
/// recursive `parallel_for` / `parallel_reduce` splitting, and the join
/// counter behind spawn groups.
pub mod executor;
/// Numeric kernels built on the executor.
pub mod kernels;
/// Associative reducers.
pub mod reducer;
mod sync;
/// Panic capture for task bodies.
pub mod task;
/// Small value types shared by reducers and kernels.
pub mod types;
mod utils;

pub use crate::error::Error;
