use std::collections::HashMap;

use regex_search_engine::{MatchSpan, NodeId, TextSource};

/// One screen row of the document pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Byte range of a single line inside a text node.
    Text { node: NodeId, start: usize, end: usize },
    Gap,
}

/// Text nodes laid out one line per row, with a gap row between nodes.
/// Every node a search can match gets rows. Skipped nodes and short blank
/// nodes take none.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    lines: Vec<Line>,
    first_row: HashMap<NodeId, usize>,
}

impl DocumentLayout {
    pub fn new<S: TextSource + ?Sized>(source: &S) -> Self {
        let mut layout = Self::default();
        for leaf in source.leaves() {
            let shown = !leaf.skipped && !leaf.text.trim().is_empty();
            if !leaf.is_searchable() && !shown {
                continue;
            }
            if !layout.lines.is_empty() {
                layout.lines.push(Line::Gap);
            }
            layout.first_row.insert(leaf.node, layout.lines.len());

            let mut start = 0;
            for segment in leaf.text.split('\n') {
                let end = start + segment.len();
                layout.lines.push(Line::Text {
                    node: leaf.node,
                    start,
                    end,
                });
                start = end + 1;
            }
        }
        layout
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Row holding the start of `span`.
    pub fn row_of(&self, span: &MatchSpan) -> Option<usize> {
        let first = *self.first_row.get(&span.node)?;
        self.lines[first..]
            .iter()
            .take_while(|line| matches!(line, Line::Text { node, .. } if *node == span.node))
            .position(|line| matches!(line, Line::Text { end, .. } if span.start <= *end))
            .map(|offset| first + offset)
    }
}
