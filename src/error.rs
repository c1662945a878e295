use crate::task::TaskPanic;
use thiserror::Error;

/// Errors reported by the kernels and by [`Executor::install`].
///
/// Argument errors are raised before any buffer is touched. A singular linear
/// system is not an error: it shows up as non-finite entries in the solution.
///
/// [`Executor::install`]: crate::executor::Executor::install
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Reversed range, or a range running past the end of the buffer.
    #[error("invalid range {begin}..{end} for a buffer of length {len}")]
    InvalidRange {
        /// Requested start index.
        begin: usize,
        /// Requested end index (exclusive).
        end: usize,
        /// Length of the buffer the range was checked against.
        len: usize,
    },
    /// The integration kernel needs at least one step.
    #[error("integral sum needs at least one step")]
    ZeroSteps,
    /// `steps + 1` sample points do not fit in `usize`.
    #[error("integral sum with {steps} steps has too many sample points")]
    TooManySteps {
        /// Requested number of steps.
        steps: usize,
    },
    /// A linear system without rows.
    #[error("linear system has no rows")]
    EmptySystem,
    /// Coefficient storage does not match an augmented `rows x (rows + 1)` matrix.
    #[error("augmented matrix with {rows} rows needs {expected} coefficients, got {actual}")]
    DimensionMismatch {
        /// Number of equations.
        rows: usize,
        /// `rows * (rows + 1)`.
        expected: usize,
        /// Number of coefficients actually supplied.
        actual: usize,
    },
    /// Solution buffer length differs from the number of unknowns.
    #[error("solution buffer has length {actual}, system has {rows} unknowns")]
    SolutionLength {
        /// Number of unknowns.
        rows: usize,
        /// Length of the caller-supplied buffer.
        actual: usize,
    },
    /// A task panicked; every sibling task ran to completion before this was reported.
    #[error("task panicked: {message}")]
    TaskPanicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl From<TaskPanic> for Error {
    fn from(panic: TaskPanic) -> Self {
        Self::TaskPanicked {
            message: panic.message,
        }
    }
}
