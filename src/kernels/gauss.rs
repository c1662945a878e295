//! Gaussian elimination without pivoting.
//!
//! Forward elimination is sequential over pivot columns and row-parallel
//! within a column: step `k + 1` starts only once every row below `k` has been
//! updated, while the rows of one step are independent and mutate disjoint
//! memory. Back substitution is sequential over unknowns, with each dot
//! product computed by a parallel sum reduction.
//!
//! A zero pivot is not detected. It shows up as `NaN` or infinite entries in
//! the solution, which callers must treat as a failed solve.

use crate::{
    config::SolverConfig,
    error::Error,
    executor::{Executor, ForkJoin},
    reducer::Sum,
};
use core::ops::Range;

/// A dense `rows x rows` system with its right-hand side as an extra column.
///
/// Stored row-major: row `i` occupies `rows + 1` consecutive coefficients, the
/// last of which is the right-hand side of equation `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    rows: usize,
    coefficients: Vec<f64>,
}

impl LinearSystem {
    /// Wrap row-major augmented coefficients.
    ///
    /// # Errors
    /// [`Error::EmptySystem`] for zero rows, [`Error::DimensionMismatch`] when
    /// `coefficients.len() != rows * (rows + 1)`.
    pub fn from_augmented(rows: usize, coefficients: Vec<f64>) -> Result<Self, Error> {
        if rows == 0 {
            return Err(Error::EmptySystem);
        }
        let expected = rows * (rows + 1);
        if coefficients.len() != expected {
            return Err(Error::DimensionMismatch {
                rows,
                expected,
                actual: coefficients.len(),
            });
        }
        Ok(Self { rows, coefficients })
    }

    /// Build from one augmented row per equation.
    ///
    /// # Errors
    /// As [`from_augmented`](Self::from_augmented), including rows of the
    /// wrong width.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, Error> {
        let count = rows.len();
        if rows.iter().any(|row| row.as_ref().len() != count + 1) {
            return Err(Error::DimensionMismatch {
                rows: count,
                expected: count * (count + 1),
                actual: rows.iter().map(|row| row.as_ref().len()).sum(),
            });
        }
        let coefficients = rows.iter().flat_map(|row| row.as_ref().iter().copied()).collect();
        Self::from_augmented(count, coefficients)
    }

    /// Number of equations, which is also the number of unknowns.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Width of a stored row: `rows + 1`.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.rows + 1
    }

    /// Augmented row `i`.
    ///
    /// # Panics
    /// If `i >= rows`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.coefficients[self.row_span(i)]
    }

    /// Coefficient at row `i`, column `j`; column `rows` is the right-hand side.
    ///
    /// # Panics
    /// If the position is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row(i)[j]
    }

    /// All coefficients, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.coefficients
    }

    /// Gives the coefficient storage back.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.coefficients
    }

    /// `A x - b` for a candidate solution `x`, one entry per equation.
    ///
    /// # Errors
    /// [`Error::SolutionLength`] if `solution` has the wrong length.
    pub fn residual(&self, solution: &[f64]) -> Result<Vec<f64>, Error> {
        self.check_solution(solution.len())?;
        Ok((0..self.rows)
            .map(|i| {
                let row = self.row(i);
                let lhs: f64 = row[..self.rows]
                    .iter()
                    .zip(solution)
                    .map(|(a, x)| a * x)
                    .sum();
                lhs - row[self.rows]
            })
            .collect())
    }

    /// Whether every entry below the diagonal is within `tolerance` of zero.
    #[must_use]
    pub fn is_upper_triangular(&self, tolerance: f64) -> bool {
        (1..self.rows).all(|i| self.row(i)[..i].iter().all(|value| value.abs() <= tolerance))
    }

    fn row_span(&self, i: usize) -> Range<usize> {
        let columns = self.columns();
        i * columns..(i + 1) * columns
    }

    fn check_solution(&self, actual: usize) -> Result<(), Error> {
        if actual != self.rows {
            return Err(Error::SolutionLength {
                rows: self.rows,
                actual,
            });
        }
        Ok(())
    }
}

/// Zero the sub-diagonal of `system` column by column.
///
/// For pivot `k`, every row `i > k` gets `koef * row k` added from column `k`
/// through the right-hand side, with `koef = -a[i][k] / a[k][k]`. The rows of
/// one step are processed in parallel with leaves of
/// `config.elimination_grain` rows; the pivot row is only read.
pub fn forward_eliminate(fj: ForkJoin, system: &mut LinearSystem, config: &SolverConfig) {
    let rows = system.rows;
    let columns = system.columns();
    for k in 0..rows {
        let (head, tail) = system.coefficients.split_at_mut((k + 1) * columns);
        let pivot_row = &head[k * columns..];
        fj.for_each_chunk_mut(tail, columns, config.elimination_grain, &|_, row| {
            let koef = -row[k] / pivot_row[k];
            for (value, pivot) in row[k..].iter_mut().zip(&pivot_row[k..]) {
                *value += koef * pivot;
            }
        });
    }
}

/// Solve an upper-triangular `system` into `result`, last unknown first.
///
/// `result[k] = (b[k] - sum(a[k][j] * result[j], j > k)) / a[k][k]`, with the
/// sum computed by a parallel reduction seeded with `b[k]`.
///
/// # Errors
/// [`Error::SolutionLength`] if `result` has the wrong length.
pub fn back_substitute(
    fj: ForkJoin,
    system: &LinearSystem,
    result: &mut [f64],
    config: &SolverConfig,
) -> Result<(), Error> {
    system.check_solution(result.len())?;
    let rows = system.rows;
    let last = rows - 1;
    result[last] = system.get(last, rows) / system.get(last, last);
    for k in (0..last).rev() {
        let row = system.row(k);
        let solved = &*result;
        let numerator = fj.parallel_reduce_seeded(
            row[rows],
            k + 1..rows,
            config.substitution_grain,
            &Sum::new(),
            &|j| -row[j] * solved[j],
        );
        result[k] = numerator / row[k];
    }
    Ok(())
}

/// Solve `system` in place, writing the unknowns into `result`.
///
/// `system` is left upper-triangular.
///
/// # Errors
/// [`Error::SolutionLength`] before anything is mutated if `result` has the
/// wrong length, or a captured task panic.
pub fn solve_into(
    executor: &Executor,
    system: &mut LinearSystem,
    result: &mut [f64],
    config: &SolverConfig,
) -> Result<(), Error> {
    system.check_solution(result.len())?;
    log::debug!(
        "solving {0}x{0} system, elimination grain {1}, substitution grain {2}",
        system.rows,
        config.elimination_grain,
        config.substitution_grain
    );
    executor.install(|fj| {
        forward_eliminate(fj, system, config);
        log::trace!("forward elimination done");
        back_substitute(fj, system, result, config)
    })
}

/// Solve `system` in place and return the unknowns.
///
/// # Errors
/// A captured task panic.
pub fn solve(
    executor: &Executor,
    system: &mut LinearSystem,
    config: &SolverConfig,
) -> Result<Vec<f64>, Error> {
    let mut result = vec![0.0; system.rows];
    solve_into(executor, system, &mut result, config)?;
    Ok(result)
}
