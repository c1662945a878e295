//! Associative accumulators merged at fork-join boundaries.
//!
//! A [`Reducer`] is a monoid: an [`identity`](Reducer::identity) view, a way to
//! fold one item into a view, and an associative [`combine`](Reducer::combine).
//! Every leaf of a parallel reduction folds into its own view, so concurrent
//! strands never share state; views are combined when their fork joins. The
//! result is therefore independent of how the range was split or which worker
//! ran which leaf, up to floating-point reassociation for [`Sum`] over floats.

use crate::types::Indexed;
use core::{marker::PhantomData, ops::Add};

/// An associative accumulator.
///
/// Implementations must satisfy, for all views `a`, `b`, `c`:
/// - `combine(combine(a, b), c) == combine(a, combine(b, c))`;
/// - `combine(identity(), a) == a == combine(a, identity())`.
pub trait Reducer: Sync {
    /// What a loop body contributes per index.
    type Item;
    /// Partial result held by one strand.
    type Value: Send;

    /// The neutral view.
    fn identity(&self) -> Self::Value;
    /// Folds one item into a view.
    fn accumulate(&self, view: &mut Self::Value, item: Self::Item);
    /// Merges the view of a left range with the view of the range right after it.
    fn combine(&self, left: Self::Value, right: Self::Value) -> Self::Value;

    /// Reduces an iterator serially.
    fn reduce_iter(&self, items: impl IntoIterator<Item = Self::Item>) -> Self::Value {
        let mut view = self.identity();
        for item in items {
            self.accumulate(&mut view, item);
        }
        view
    }
}

/// Addition, with `T::default()` as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum<T>(PhantomData<fn() -> T>);

impl<T> Sum<T> {
    /// A summing reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Reducer for Sum<T>
where
    T: Add<Output = T> + Default + Copy + Send,
{
    type Item = T;
    type Value = T;

    fn identity(&self) -> T {
        T::default()
    }

    fn accumulate(&self, view: &mut T, item: T) {
        *view = *view + item;
    }

    fn combine(&self, left: T, right: T) -> T {
        left + right
    }
}

/// Largest value and its index; ties go to the lowest index.
///
/// Items are `(index, value)` pairs. The view is `None` until a comparable
/// value is seen. Values that do not compare equal to themselves (NaN) are
/// skipped, so a view never holds one and a range of only such values
/// reduces to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxWithIndex<V>(PhantomData<fn() -> V>);

impl<V> MaxWithIndex<V> {
    /// A max-with-index reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: PartialOrd + Send> Reducer for MaxWithIndex<V> {
    type Item = (usize, V);
    type Value = Option<Indexed<V>>;

    fn identity(&self) -> Self::Value {
        None
    }

    fn accumulate(&self, view: &mut Self::Value, (index, value): Self::Item) {
        if is_unordered(&value) {
            return;
        }
        let candidate = Some(Indexed::new(index, value));
        let current = view.take();
        *view = self.combine(current, candidate);
    }

    fn combine(&self, left: Self::Value, right: Self::Value) -> Self::Value {
        pick(left, right, |a, b| a.value > b.value)
    }
}

/// Smallest value and its index; ties go to the lowest index.
///
/// Mirror image of [`MaxWithIndex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MinWithIndex<V>(PhantomData<fn() -> V>);

impl<V> MinWithIndex<V> {
    /// A min-with-index reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<V: PartialOrd + Send> Reducer for MinWithIndex<V> {
    type Item = (usize, V);
    type Value = Option<Indexed<V>>;

    fn identity(&self) -> Self::Value {
        None
    }

    fn accumulate(&self, view: &mut Self::Value, (index, value): Self::Item) {
        if is_unordered(&value) {
            return;
        }
        let candidate = Some(Indexed::new(index, value));
        let current = view.take();
        *view = self.combine(current, candidate);
    }

    fn combine(&self, left: Self::Value, right: Self::Value) -> Self::Value {
        pick(left, right, |a, b| a.value < b.value)
    }
}

/// Whether `value` has no place in the order, like a floating-point NaN.
fn is_unordered<V: PartialOrd>(value: &V) -> bool {
    value.partial_cmp(value).is_none()
}

/// Keeps `right` only if it beats `left`, or equals it at a lower index.
fn pick<V: PartialOrd>(
    left: Option<Indexed<V>>,
    right: Option<Indexed<V>>,
    beats: impl Fn(&Indexed<V>, &Indexed<V>) -> bool,
) -> Option<Indexed<V>> {
    match (left, right) {
        (None, other) | (other, None) => other,
        (Some(left), Some(right)) => {
            let ties_lower = left.value == right.value && right.index < left.index;
            if beats(&right, &left) || ties_lower {
                Some(right)
            } else {
                Some(left)
            }
        }
    }
}

/// Collects items into a `Vec`.
///
/// Only the multiset of items is part of the contract. Within one fork-join
/// tree views are combined left to right, so a reduction over an index range
/// yields items in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Append<T>(PhantomData<fn() -> T>);

impl<T> Append<T> {
    /// An appending reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Send> Reducer for Append<T> {
    type Item = T;
    type Value = Vec<T>;

    fn identity(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, view: &mut Vec<T>, item: T) {
        view.push(item);
    }

    fn combine(&self, mut left: Vec<T>, mut right: Vec<T>) -> Vec<T> {
        if left.is_empty() {
            return right;
        }
        left.append(&mut right);
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_prefers_lowest_index_on_ties() {
        let reducer = MaxWithIndex::new();
        let view = reducer.reduce_iter([3, 9, 1, 9, 4].into_iter().enumerate());
        assert_eq!(view, Some(Indexed::new(1, 9)));
        let swapped = reducer.combine(
            reducer.reduce_iter([(3, 9)]),
            reducer.reduce_iter([(1, 9)]),
        );
        assert_eq!(swapped, Some(Indexed::new(1, 9)));
    }

    #[test]
    fn min_prefers_lowest_index_on_ties() {
        let reducer = MinWithIndex::new();
        let view = reducer.reduce_iter([5, 2, 8, 2].into_iter().enumerate());
        assert_eq!(view, Some(Indexed::new(1, 2)));
    }

    #[test]
    fn identity_is_neutral() {
        let sum = Sum::<i64>::new();
        assert_eq!(sum.combine(sum.identity(), 7), 7);
        let max = MaxWithIndex::<i32>::new();
        let view = Some(Indexed::new(4, -3));
        assert_eq!(max.combine(max.identity(), view), view);
        assert_eq!(max.combine(view, max.identity()), view);
        let append = Append::new();
        assert_eq!(append.combine(vec![1, 2], append.identity()), vec![1, 2]);
    }

    #[test]
    fn append_keeps_left_before_right() {
        let append = Append::new();
        assert_eq!(append.combine(vec![1, 2], vec![3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(append.combine(vec![], vec![4]), vec![4]);
    }

    #[test]
    fn nan_never_wins() {
        let max = MaxWithIndex::new();
        let view = max.reduce_iter([(0, 1.0), (1, f64::NAN), (2, 0.5)]);
        assert_eq!(view, Some(Indexed::new(0, 1.0)));
        let view = max.reduce_iter([(0, f64::NAN), (1, 9.0)]);
        assert_eq!(view, Some(Indexed::new(1, 9.0)));
        let min = MinWithIndex::new();
        let view = min.reduce_iter([(0, f64::NAN), (1, 9.0), (2, 3.0)]);
        assert_eq!(view, Some(Indexed::new(2, 3.0)));
    }

    #[test]
    fn nan_only_input_has_no_extremum() {
        let max = MaxWithIndex::<f64>::new();
        assert_eq!(max.reduce_iter([(0, f64::NAN), (1, f64::NAN)]), None);
    }

    #[test]
    fn nan_does_not_break_associativity() {
        let max = MaxWithIndex::new();
        let a = max.reduce_iter([(0, 5.0)]);
        let b = max.reduce_iter([(1, f64::NAN)]);
        let c = max.reduce_iter([(2, 7.0)]);
        assert_eq!(max.combine(max.combine(a, b), c), max.combine(a, max.combine(b, c)));
        assert_eq!(max.combine(a, max.combine(b, c)), Some(Indexed::new(2, 7.0)));
    }
}
