//! Compact byte range into inline text.
//!
//! `u32` offsets keep inline events small; inline content is bounded by the
//! paragraph it came from.

/// Half-open byte range `[start, end)`.
///
/// # Example
/// ```
/// use alertmark::Range;
///
/// let text = b"Be careful";
/// assert_eq!(Range::new(3, 10).slice(text), b"careful");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Build from `usize` offsets. Offsets must fit in `u32`.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// The bytes this range covers.
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` falls inside the range.
    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::from_usize(r.start, r.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_and_len() {
        let r = Range::new(2, 5);
        assert_eq!(r.slice(b"::info"), b"inf");
        assert_eq!(r.len(), 3);
        assert!(!r.is_empty());
        assert!(Range::new(4, 4).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Range::new(10, 20);
        assert!(!r.contains(9));
        assert!(r.contains(10));
        assert!(r.contains(19));
        assert!(!r.contains(20));
    }

    #[test]
    fn test_from_std_range() {
        let r: Range = (3usize..7usize).into();
        assert_eq!(r, Range::new(3, 7));
    }
}
