use crate::{
    config::{ExecutionMode, Grain},
    error::Error,
    executor::{Executor, ForkJoin},
    utils::checked_range,
};

/// Sort `buffer[begin..end]` ascending, in place and unstably.
///
/// Textbook quicksort: the last element is the pivot, one pass moves every
/// element `< pivot` in front of it, then the left partition is spawned while
/// the current task sorts the right one, followed by a sync. Elements equal to
/// the pivot end up in the right partition. Partitions of at most `grain`
/// elements are sorted serially by the same algorithm.
///
/// The pivot choice is kept deliberately: already sorted or reverse sorted
/// input takes `O(n^2)` time and `O(n)` recursion depth.
///
/// # Errors
/// [`Error::InvalidRange`] before anything moves, or a panic raised by a
/// user-defined `PartialOrd`.
pub fn parallel_sort<T>(
    executor: &Executor,
    buffer: &mut [T],
    begin: usize,
    end: usize,
    grain: Grain,
) -> Result<(), Error>
where
    T: PartialOrd + Send,
{
    let range = checked_range(begin, end, buffer.len())?;
    log::debug!("quicksort {range:?}, grain {grain}");
    let slice = &mut buffer[range];
    executor.install(|fj| quicksort(fj, slice, grain))
}

fn quicksort<T>(fj: ForkJoin, slice: &mut [T], grain: Grain) -> Result<(), Error>
where
    T: PartialOrd + Send,
{
    if slice.len() <= grain.get() || fj.mode() == ExecutionMode::Serial {
        serial_quicksort(slice);
        return Ok(());
    }
    let middle = partition(slice);
    let (left, rest) = slice.split_at_mut(middle);
    let right = &mut rest[1..];
    fj.scope(|group| {
        group.spawn(move |fj| quicksort(fj, left, grain));
        quicksort(fj, right, grain)?;
        group.sync()
    })
}

fn serial_quicksort<T: PartialOrd>(slice: &mut [T]) {
    if slice.len() <= 1 {
        return;
    }
    let middle = partition(slice);
    let (left, rest) = slice.split_at_mut(middle);
    serial_quicksort(left);
    serial_quicksort(&mut rest[1..]);
}

/// Moves every element `< pivot` (the last element) to the front, then puts
/// the pivot right after them. Returns the pivot's final position.
fn partition<T: PartialOrd>(slice: &mut [T]) -> usize {
    let last = slice.len() - 1;
    let mut store = 0;
    for index in 0..last {
        if slice[index] < slice[last] {
            slice.swap(index, store);
            store += 1;
        }
    }
    slice.swap(store, last);
    store
}
