//! Numeric kernels expressed through [`ForkJoin`](crate::executor::ForkJoin)
//! and [`Reducer`](crate::reducer::Reducer).
//!
//! Every kernel borrows its buffer for the duration of the call only, checks
//! its range arguments before touching the buffer, and runs on the given
//! [`Executor`](crate::executor::Executor), so the same call serves as the
//! serial baseline or the parallel version depending on its mode.

/// Parallel fill and collect.
pub mod fill;
/// Gaussian elimination for dense systems.
pub mod gauss;
/// Max/min with index, sums and the integration sample sum.
pub mod reduce;
/// Parallel quicksort.
pub mod sort;

pub use fill::{parallel_collect, parallel_fill};
pub use gauss::{LinearSystem, solve, solve_into};
pub use reduce::{integral_sum, max_with_index, min_with_index, sum};
pub use sort::parallel_sort;
