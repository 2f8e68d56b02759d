use std::cmp::{Ord, Ordering, PartialOrd};
use std::fmt;

/// The region of source code a declaration, expression, or diagnostic covers.
///
/// Spans are half-open byte ranges into the source text of a compilation unit.
/// The engine never renders source excerpts itself, so byte offsets are all we
/// need; turning them into line/column pairs is up to whatever presents the
/// diagnostics.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    /// Returns a span covering both `start` and `end`.
    pub fn covering(start: Span, end: Span) -> Span {
        Span { start: start.start, end: end.end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl Default for Span {
    fn default() -> Span {
        Span { start: 0, end: 0 }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "bytes {}..{}", self.start, self.end)
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Span) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Span) -> Ordering {
        let ord = self.start.cmp(&other.start);

        if ord == Ordering::Equal {
            return self.end.cmp(&other.end);
        }

        ord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covering() {
        let a = Span::new(2, 4);
        let b = Span::new(10, 14);

        assert_eq!(Span::covering(a, b), Span::new(2, 14));
    }

    #[test]
    fn test_contains() {
        let span = Span::new(2, 4);

        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(!span.contains(4));
        assert!(!span.contains(1));
    }

    #[test]
    fn test_ordering() {
        assert!(Span::new(1, 2) < Span::new(2, 3));
        assert!(Span::new(1, 2) < Span::new(1, 3));
    }
}
