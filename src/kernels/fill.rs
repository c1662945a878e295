use crate::{
    config::Grain,
    error::Error,
    executor::Executor,
    reducer::Append,
    utils::checked_range,
};

/// Write `generator(i)` into `buffer[i]` for every `i` in `begin..end`.
///
/// Leaves own disjoint sub-slices, so each slot is written exactly once and
/// without synchronization. Slots outside the range are left untouched.
///
/// # Errors
/// [`Error::InvalidRange`] before anything is written, or a panic raised by
/// `generator`.
pub fn parallel_fill<T, G>(
    executor: &Executor,
    buffer: &mut [T],
    begin: usize,
    end: usize,
    grain: Grain,
    generator: G,
) -> Result<(), Error>
where
    T: Send,
    G: Fn(usize) -> T + Sync,
{
    let range = checked_range(begin, end, buffer.len())?;
    log::trace!("fill {range:?}, grain {grain}");
    let slots = &mut buffer[range];
    executor.install(|fj| {
        fj.for_each_chunk_mut(slots, 1, grain, &|offset, slot| {
            for (index, value) in (begin + offset..).zip(slot) {
                *value = generator(index);
            }
        });
        Ok(())
    })
}

/// Build a vector of `generator(0), ..., generator(len - 1)` by appending
/// from concurrent strands into an [`Append`] reducer.
///
/// Views are merged left to right, so the output is in index order.
///
/// # Errors
/// A panic raised by `generator`.
pub fn parallel_collect<T, G>(
    executor: &Executor,
    len: usize,
    grain: Grain,
    generator: G,
) -> Result<Vec<T>, Error>
where
    T: Send,
    G: Fn(usize) -> T + Sync,
{
    executor.install(|fj| Ok(fj.parallel_reduce(0..len, grain, &Append::new(), &generator)))
}
