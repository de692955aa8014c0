use std::error::Error;
use std::fmt;
use std::ops::{
    Bound::{Excluded, Included, Unbounded},
    Range, RangeBounds,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OobKind {
    StartPastLen,
    EndPastLen,
    Inverted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OutOfBounds {
    pub start: usize,
    pub end: usize,
    pub len: usize,
    pub kind: OobKind,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { start, end, len, kind } = self;
        match kind {
            OobKind::StartPastLen => write!(
                fmt,
                "range start index {start} out of range for length {len}"
            ),
            OobKind::EndPastLen => write!(
                fmt,
                "range end index {end} out of range for length {len}"
            ),
            OobKind::Inverted => {
                write!(fmt, "range starts at {start} but ends at {end}")
            }
        }
    }
}

impl Error for OutOfBounds {}

pub trait UsizeBounds {
    fn checked_to_range(&self, len: usize) -> Result<Range<usize>, OutOfBounds>;
    fn to_range(&self, len: usize) -> Range<usize> {
        match self.checked_to_range(len) {
            Ok(range) => range,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<R: RangeBounds<usize>> UsizeBounds for R {
    fn checked_to_range(&self, len: usize) -> Result<Range<usize>, OutOfBounds> {
        let start = match self.start_bound() {
            Included(&s) => s,
            Excluded(&s) => s + 1,
            Unbounded => 0,
        };
        let end = match self.end_bound() {
            Included(&e) => e + 1,
            Excluded(&e) => e,
            Unbounded => len,
        };

        let kind = if start > len {
            OobKind::StartPastLen
        } else if end > len {
            OobKind::EndPastLen
        } else if start > end {
            OobKind::Inverted
        } else {
            return Ok(start..end);
        };
        Err(OutOfBounds { start, end, len, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves() {
        assert_eq!((1..4).to_range(5), 1..4);
        assert_eq!((1..=4).to_range(5), 1..5);
        assert_eq!((..).to_range(5), 0..5);
        assert_eq!((2..).to_range(5), 2..5);
        assert_eq!((..3).to_range(5), 0..3);
        assert_eq!((3..3).to_range(5), 3..3);
        assert_eq!((5..).to_range(5), 5..5);
    }

    #[test]
    fn rejects() {
        assert_eq!(
            (2..9).checked_to_range(5),
            Err(OutOfBounds { start: 2, end: 9, len: 5, kind: OobKind::EndPastLen })
        );
        assert_eq!(
            (6..9).checked_to_range(5),
            Err(OutOfBounds { start: 6, end: 9, len: 5, kind: OobKind::StartPastLen })
        );
        assert_eq!(
            (3..1).checked_to_range(5),
            Err(OutOfBounds { start: 3, end: 1, len: 5, kind: OobKind::Inverted })
        );
    }

    #[test]
    #[should_panic(expected = "range end index 9 out of range for length 5")]
    fn panics_past_len() { (2..9).to_range(5); }

    #[test]
    #[should_panic(expected = "range starts at 3 but ends at 1")]
    fn panics_inverted() { (3..1).to_range(5); }
}
