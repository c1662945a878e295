use crate::{config::Grain, executor::ForkJoin, reducer::Reducer, utils::RangeSplitAtHalf};
use core::{convert::Infallible, ops::Range};

impl ForkJoin {
    /// Run `body` over `range`, split into leaves of at most `grain` indices.
    ///
    /// The range is bisected recursively: the left half is forked, the right
    /// half runs in the current task, then both are joined. This gives a
    /// balanced tree of depth `O(log(len / grain))`. Each leaf receives its
    /// sub-range and runs serially. An empty or reversed range does nothing.
    ///
    /// # Errors
    /// The error of the leftmost failing leaf; every other leaf still runs.
    pub fn parallel_for<E, F>(self, range: Range<usize>, grain: Grain, body: &F) -> Result<(), E>
    where
        F: Fn(Range<usize>) -> Result<(), E> + Sync,
        E: Send,
    {
        if range.len() <= grain.get() {
            return if range.is_empty() { Ok(()) } else { body(range) };
        }
        let (left, right) = range.split_at_half();
        self.try_join(
            |fj| fj.parallel_for(left, grain, body),
            |fj| fj.parallel_for(right, grain, body),
        )?;
        Ok(())
    }

    /// Feed `body(i)` for every `i` in `range` into `reducer`.
    ///
    /// Every leaf folds into its own identity view; views are combined left
    /// with right at each join, so no view is ever shared between strands.
    ///
    /// # Errors
    /// The error of the leftmost failing leaf; every other leaf still runs.
    pub fn try_parallel_reduce<R, E, F>(
        self,
        range: Range<usize>,
        grain: Grain,
        reducer: &R,
        body: &F,
    ) -> Result<R::Value, E>
    where
        R: Reducer,
        F: Fn(usize) -> Result<R::Item, E> + Sync,
        E: Send,
    {
        if range.len() <= grain.get() {
            let mut view = reducer.identity();
            for index in range {
                reducer.accumulate(&mut view, body(index)?);
            }
            return Ok(view);
        }
        let (left, right) = range.split_at_half();
        let (left, right) = self.try_join(
            |fj| fj.try_parallel_reduce(left, grain, reducer, body),
            |fj| fj.try_parallel_reduce(right, grain, reducer, body),
        )?;
        Ok(reducer.combine(left, right))
    }

    /// Infallible [`try_parallel_reduce`](Self::try_parallel_reduce).
    pub fn parallel_reduce<R, F>(
        self,
        range: Range<usize>,
        grain: Grain,
        reducer: &R,
        body: &F,
    ) -> R::Value
    where
        R: Reducer,
        F: Fn(usize) -> R::Item + Sync,
    {
        let outcome =
            self.try_parallel_reduce(range, grain, reducer, &|index| Ok::<_, Infallible>(body(index)));
        match outcome {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// [`parallel_reduce`](Self::parallel_reduce) with `seed` as the leftmost view.
    pub fn parallel_reduce_seeded<R, F>(
        self,
        seed: R::Value,
        range: Range<usize>,
        grain: Grain,
        reducer: &R,
        body: &F,
    ) -> R::Value
    where
        R: Reducer,
        F: Fn(usize) -> R::Item + Sync,
    {
        let reduced = self.parallel_reduce(range, grain, reducer, body);
        reducer.combine(seed, reduced)
    }

    /// Run `body(chunk_index, chunk)` over `data` cut into chunks of
    /// `chunk_len` elements (the last one may be shorter).
    ///
    /// Leaves hold at most `grain` chunks. Chunks are disjoint, so bodies
    /// mutate them without any synchronization. A `chunk_len` of zero is
    /// treated as one.
    ///
    /// # Errors
    /// The error of the leftmost failing leaf; every other leaf still runs.
    pub fn try_for_each_chunk_mut<T, E, F>(
        self,
        data: &mut [T],
        chunk_len: usize,
        grain: Grain,
        body: &F,
    ) -> Result<(), E>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<(), E> + Sync,
        E: Send,
    {
        self.split_chunks(data, 0, chunk_len.max(1), grain, body)
    }

    /// Infallible [`try_for_each_chunk_mut`](Self::try_for_each_chunk_mut).
    pub fn for_each_chunk_mut<T, F>(self, data: &mut [T], chunk_len: usize, grain: Grain, body: &F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let outcome = self.try_for_each_chunk_mut(data, chunk_len, grain, &|index, chunk| {
            body(index, chunk);
            Ok::<_, Infallible>(())
        });
        match outcome {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn split_chunks<T, E, F>(
        self,
        data: &mut [T],
        first_chunk: usize,
        chunk_len: usize,
        grain: Grain,
        body: &F,
    ) -> Result<(), E>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<(), E> + Sync,
        E: Send,
    {
        let chunks = data.len().div_ceil(chunk_len);
        if chunks <= grain.get() {
            for (offset, chunk) in data.chunks_mut(chunk_len).enumerate() {
                body(first_chunk + offset, chunk)?;
            }
            return Ok(());
        }
        let half = chunks / 2;
        let (left, right) = data.split_at_mut(half * chunk_len);
        self.try_join(
            |fj| fj.split_chunks(left, first_chunk, chunk_len, grain, body),
            |fj| fj.split_chunks(right, first_chunk + half, chunk_len, grain, body),
        )?;
        Ok(())
    }
}
