use crate::{
    config::Grain,
    error::Error,
    executor::Executor,
    reducer::{MaxWithIndex, MinWithIndex, Reducer, Sum},
    types::Indexed,
    utils::checked_range,
};
use core::ops::Add;

/// Largest element of `data[begin..end]` and the index of its first occurrence.
///
/// Elements unordered against themselves (NaN) are skipped. Returns `Ok(None)`
/// for an empty range or one holding only such elements.
///
/// # Errors
/// [`Error::InvalidRange`] for a reversed or out-of-bounds range, or a task
/// panic from a user-defined `PartialOrd`.
pub fn max_with_index<V>(
    executor: &Executor,
    data: &[V],
    begin: usize,
    end: usize,
    grain: Grain,
) -> Result<Option<Indexed<V>>, Error>
where
    V: PartialOrd + Copy + Send + Sync,
{
    extremum(executor, &MaxWithIndex::new(), data, begin, end, grain)
}

/// Smallest element of `data[begin..end]` and the index of its first occurrence.
///
/// Elements unordered against themselves (NaN) are skipped. Returns `Ok(None)`
/// for an empty range or one holding only such elements.
///
/// # Errors
/// [`Error::InvalidRange`] for a reversed or out-of-bounds range, or a task
/// panic from a user-defined `PartialOrd`.
pub fn min_with_index<V>(
    executor: &Executor,
    data: &[V],
    begin: usize,
    end: usize,
    grain: Grain,
) -> Result<Option<Indexed<V>>, Error>
where
    V: PartialOrd + Copy + Send + Sync,
{
    extremum(executor, &MinWithIndex::new(), data, begin, end, grain)
}

fn extremum<V, R>(
    executor: &Executor,
    reducer: &R,
    data: &[V],
    begin: usize,
    end: usize,
    grain: Grain,
) -> Result<Option<Indexed<V>>, Error>
where
    V: Copy + Send + Sync,
    R: Reducer<Item = (usize, V), Value = Option<Indexed<V>>>,
{
    let range = checked_range(begin, end, data.len())?;
    log::trace!("extremum over {range:?}, grain {grain}");
    executor.install(|fj| Ok(fj.parallel_reduce(range, grain, reducer, &|index| (index, data[index]))))
}

/// Sum of `data[begin..end]`.
///
/// For floating-point values the result matches a serial sum only up to
/// reassociation error.
///
/// # Errors
/// [`Error::InvalidRange`] for a reversed or out-of-bounds range.
pub fn sum<T>(executor: &Executor, data: &[T], begin: usize, end: usize, grain: Grain) -> Result<T, Error>
where
    T: Add<Output = T> + Default + Copy + Send + Sync,
{
    let range = checked_range(begin, end, data.len())?;
    executor.install(|fj| Ok(fj.parallel_reduce(range, grain, &Sum::new(), &|index| data[index])))
}

/// `f(a + i * h)` summed over `i = 0..=steps`, with `h = (b - a) / steps`.
///
/// This is the plain sample sum of the rectangle rule without the final
/// multiplication by `h`.
///
/// # Errors
/// [`Error::ZeroSteps`] when `steps == 0`, [`Error::TooManySteps`] when
/// `steps == usize::MAX`.
pub fn integral_sum<F>(
    executor: &Executor,
    a: f64,
    b: f64,
    steps: usize,
    grain: Grain,
    f: F,
) -> Result<f64, Error>
where
    F: Fn(f64) -> f64 + Sync,
{
    if steps == 0 {
        return Err(Error::ZeroSteps);
    }
    let samples = steps
        .checked_add(1)
        .ok_or(Error::TooManySteps { steps })?;
    #[allow(clippy::cast_precision_loss)]
    let h = (b - a) / steps as f64;
    log::debug!("integral sum over [{a}, {b}] with {steps} steps, grain {grain}");
    executor.install(|fj| {
        #[allow(clippy::cast_precision_loss)]
        let sample = |index: usize| f(a + index as f64 * h);
        Ok(fj.parallel_reduce(0..samples, grain, &Sum::new(), &sample))
    })
}
