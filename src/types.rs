use derive_more::Display;

/// A value together with the index it was found at.
///
/// Produced by [`MaxWithIndex`](crate::reducer::MaxWithIndex) and
/// [`MinWithIndex`](crate::reducer::MinWithIndex).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display("{value} at {index}")]
pub struct Indexed<V> {
    /// Position of `value` in the scanned buffer.
    pub index: usize,
    /// The reported value.
    pub value: V,
}

impl<V> Indexed<V> {
    /// Pairs `value` with `index`.
    pub const fn new(index: usize, value: V) -> Self {
        Self { index, value }
    }
}
