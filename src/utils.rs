use crate::error::Error;
use core::ops::Range;

pub(crate) trait RangeSplitAtHalf {
    fn split_at_half(&self) -> (Range<usize>, Range<usize>);
}

impl RangeSplitAtHalf for Range<usize> {
    #[inline]
    fn split_at_half(&self) -> (Range<usize>, Range<usize>) {
        let mid_abs = self.start + self.len() / 2;
        (self.start..mid_abs, mid_abs..self.end)
    }
}

/// Validates `begin..end` against a buffer of length `len`.
///
/// # Errors
/// [`Error::InvalidRange`] if the range is reversed or runs past the buffer.
pub(crate) fn checked_range(begin: usize, end: usize, len: usize) -> Result<Range<usize>, Error> {
    if begin > end || end > len {
        return Err(Error::InvalidRange { begin, end, len });
    }
    Ok(begin..end)
}
