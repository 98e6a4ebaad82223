//! Span tracking for source locations.

/// A span representing a range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the start (inclusive)
    pub start: u32,
    /// Byte offset of the end (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span.
    ///
    /// With `include_end`, an offset sitting exactly on the end boundary
    /// counts as inside, which is what a cursor placed right after the last
    /// character of a token expects.
    #[inline]
    pub fn contains(&self, offset: u32, include_end: bool) -> bool {
        (offset >= self.start && offset < self.end) || (include_end && offset == self.end)
    }

    /// Get the source text for this span.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

impl From<std::ops::Range<u32>> for Span {
    fn from(range: std::ops::Range<u32>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start as usize..span.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_respects_right_bound() {
        let span = Span::new(2, 5);
        assert!(!span.contains(1, true));
        assert!(span.contains(2, false));
        assert!(span.contains(4, false));
        assert!(!span.contains(5, false));
        assert!(span.contains(5, true));
    }

    #[test]
    fn slice_and_len() {
        let span = Span::new(1, 4);
        assert_eq!(span.slice("\"abc\""), "abc");
        assert_eq!(span.len(), 3);
        assert!(Span::empty(7).is_empty());
    }
}
