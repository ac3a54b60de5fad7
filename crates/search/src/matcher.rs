use crate::document::NodeId;

/// A located occurrence inside a single text node. Offsets are byte offsets
/// into that node's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchSpan {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(node: NodeId, start: usize, end: usize) -> Self {
        Self { node, start, end }
    }

    pub fn contains(&self, node: NodeId, offset: usize) -> bool {
        self.node == node && offset >= self.start && offset < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone)]
pub struct MatchSet {
    spans: Vec<MatchSpan>,
    current_index: Option<usize>,
}

impl Default for MatchSet {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSet {
    pub fn new() -> Self {
        Self {
            spans: Vec::new(),
            current_index: None,
        }
    }

    pub fn from_spans(spans: Vec<MatchSpan>) -> Self {
        let current_index = if spans.is_empty() { None } else { Some(0) };
        Self {
            spans,
            current_index,
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&MatchSpan> {
        self.current_index.and_then(|i| self.spans.get(i))
    }

    /// 1-based position of the current span and the total count.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_index.map(|i| (i + 1, self.spans.len()))
    }

    /// Cyclic step. Returns `None` and leaves the index alone when empty.
    pub fn step(&mut self, direction: Direction) -> Option<&MatchSpan> {
        let len = self.spans.len();
        if len == 0 {
            return None;
        }
        let current = self.current_index.unwrap_or(0);
        let next = match direction {
            Direction::Next => (current + 1) % len,
            Direction::Previous => (current + len - 1) % len,
        };
        self.current_index = Some(next);
        self.spans.get(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> MatchSet {
        MatchSet::from_spans(vec![
            MatchSpan::new(0, 0, 5),
            MatchSpan::new(1, 10, 15),
            MatchSpan::new(2, 5, 10),
        ])
    }

    #[test]
    fn test_span_contains() {
        let span = MatchSpan::new(5, 10, 15);
        assert!(span.contains(5, 10));
        assert!(span.contains(5, 14));
        assert!(!span.contains(5, 15));
        assert!(!span.contains(5, 9));
        assert!(!span.contains(4, 12));
    }

    #[test]
    fn test_empty_set() {
        let mut set = MatchSet::new();
        assert!(set.is_empty());
        assert!(set.current().is_none());
        assert!(set.position().is_none());
        assert!(set.step(Direction::Next).is_none());
        assert!(set.step(Direction::Previous).is_none());
        assert_eq!(set.current_index(), None);
    }

    #[test]
    fn test_navigation_wraps_both_ways() {
        let mut set = three();
        assert_eq!(set.position(), Some((1, 3)));

        set.step(Direction::Next);
        assert_eq!(set.position(), Some((2, 3)));
        set.step(Direction::Next);
        set.step(Direction::Next);
        assert_eq!(set.position(), Some((1, 3)));

        set.step(Direction::Previous);
        assert_eq!(set.position(), Some((3, 3)));
        assert_eq!(set.current().unwrap().node, 2);
    }

    #[test]
    fn test_cyclic_closure() {
        for direction in [Direction::Next, Direction::Previous] {
            let mut set = three();
            set.step(Direction::Next);
            for _ in 0..set.len() {
                set.step(direction);
            }
            assert_eq!(set.current_index(), Some(1));
        }
    }

    #[test]
    fn test_single_span_steps_in_place() {
        let mut set = MatchSet::from_spans(vec![MatchSpan::new(3, 1, 2)]);
        set.step(Direction::Previous);
        assert_eq!(set.current_index(), Some(0));
        set.step(Direction::Next);
        assert_eq!(set.current_index(), Some(0));
    }
}
