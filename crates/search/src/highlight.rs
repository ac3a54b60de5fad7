use std::collections::HashMap;

use crate::document::NodeId;
use crate::matcher::MatchSpan;

pub const ALL_LAYER: &str = "regex-search-all";
pub const CURRENT_LAYER: &str = "regex-search-current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Where the navigator paints and scrolls. Layers are always replaced whole.
pub trait Surface {
    fn set_all(&mut self, spans: &[MatchSpan]);

    fn set_current(&mut self, span: &MatchSpan);

    /// Empties both layers.
    fn clear(&mut self);

    /// Vertically center `span` in the viewport. No horizontal adjustment.
    fn scroll_to_center(&mut self, span: &MatchSpan, behavior: ScrollBehavior);
}

/// In-memory model of the two named highlight slots. The "all" layer is also
/// indexed per node so a painter can look up one row's ranges directly.
#[derive(Debug, Clone, Default)]
pub struct HighlightRegistry {
    all: Vec<MatchSpan>,
    all_by_node: HashMap<NodeId, Vec<(usize, usize)>>,
    current: Option<MatchSpan>,
    scroll_requests: Vec<(MatchSpan, ScrollBehavior)>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&self, name: &str) -> &[MatchSpan] {
        match name {
            ALL_LAYER => &self.all,
            CURRENT_LAYER => self.current.as_slice(),
            _ => &[],
        }
    }

    pub fn current(&self) -> Option<&MatchSpan> {
        self.current.as_ref()
    }

    pub fn is_clear(&self) -> bool {
        self.all.is_empty() && self.current.is_none()
    }

    /// `(start, end)` ranges of the "all" layer inside `node`, ascending.
    pub fn spans_in_node(&self, node: NodeId) -> &[(usize, usize)] {
        self.all_by_node
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_any(&self, node: NodeId, offset: usize) -> bool {
        // Ranges within one node never overlap.
        let ranges = self.spans_in_node(node);
        let idx = ranges.partition_point(|(start, _)| *start <= offset);
        idx > 0 && offset < ranges[idx - 1].1
    }

    pub fn is_current(&self, node: NodeId, offset: usize) -> bool {
        self.current
            .map(|span| span.contains(node, offset))
            .unwrap_or(false)
    }

    pub fn last_scroll(&self) -> Option<&(MatchSpan, ScrollBehavior)> {
        self.scroll_requests.last()
    }
}

impl Surface for HighlightRegistry {
    fn set_all(&mut self, spans: &[MatchSpan]) {
        self.all = spans.to_vec();
        self.all_by_node.clear();
        for span in spans {
            self.all_by_node
                .entry(span.node)
                .or_default()
                .push((span.start, span.end));
        }
        for ranges in self.all_by_node.values_mut() {
            ranges.sort_unstable();
        }
    }

    fn set_current(&mut self, span: &MatchSpan) {
        self.current = Some(*span);
    }

    fn clear(&mut self) {
        self.all.clear();
        self.all_by_node.clear();
        self.current = None;
    }

    fn scroll_to_center(&mut self, span: &MatchSpan, behavior: ScrollBehavior) {
        self.scroll_requests.push((*span, behavior));
    }
}
