use std::fmt;

use crate::compiler::{self, CompiledPatterns, SearchConfig};
use crate::document::TextSource;
use crate::error::SearchError;
use crate::highlight::{ScrollBehavior, Surface};
use crate::matcher::{Direction, MatchSet, MatchSpan};

/// Receives the raw input of every search before it runs. Implementations
/// must not block and must swallow their own failures.
pub trait QueryRecorder {
    fn record(&self, raw: &str);
}

impl<F> QueryRecorder for F
where
    F: Fn(&str),
{
    fn record(&self, raw: &str) {
        self(raw)
    }
}

/// What the count label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Cleared,
    Position {
        index: usize,
        total: usize,
    },
    NoMatches,
    Invalid,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleared => Ok(()),
            Self::Position { index, total } => write!(f, "{} / {}", index, total),
            Self::NoMatches => f.write_str("No matches"),
            Self::Invalid => f.write_str("Invalid regex"),
        }
    }
}

/// Owns the match list and current index for one overlay session.
pub struct Navigator {
    config: SearchConfig,
    scroll_behavior: ScrollBehavior,
    matches: MatchSet,
    status: Status,
    error: Option<SearchError>,
    recorder: Option<Box<dyn QueryRecorder>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Navigator {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            scroll_behavior: ScrollBehavior::default(),
            matches: MatchSet::new(),
            status: Status::Cleared,
            error: None,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: impl QueryRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    pub fn with_scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.scroll_behavior = behavior;
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Why the last search reported `Invalid`.
    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    pub fn current(&self) -> Option<&MatchSpan> {
        self.matches.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.matches.current_index()
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        self.matches.position()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn search<S, H>(&mut self, input: &str, source: &S, surface: &mut H) -> Status
    where
        S: TextSource + ?Sized,
        H: Surface + ?Sized,
    {
        if let Some(recorder) = &self.recorder {
            recorder.record(input);
        }

        surface.clear();
        self.matches = MatchSet::new();
        self.error = None;
        self.status = Status::Cleared;

        let compiled = match compiler::compile(input, &self.config) {
            Ok(Some(compiled)) => compiled,
            Ok(None) => return self.status,
            Err(err) => {
                log::warn!("{}", err);
                self.error = Some(err);
                self.status = Status::Invalid;
                return self.status;
            }
        };

        let spans = collect(&compiled, source);
        log::debug!(
            "search: {} pattern(s), {} match(es)",
            compiled.patterns().len(),
            spans.len()
        );

        if spans.is_empty() {
            self.status = Status::NoMatches;
            return self.status;
        }

        self.matches = MatchSet::from_spans(spans);
        surface.set_all(self.matches.spans());
        self.show_current(surface);
        self.status
    }

    /// Cyclic step. Does nothing while there are no matches.
    pub fn step<H>(&mut self, direction: Direction, surface: &mut H) -> Option<&MatchSpan>
    where
        H: Surface + ?Sized,
    {
        self.matches.step(direction)?;
        self.show_current(surface);
        self.matches.current()
    }

    /// Overlay teardown: drops all state and paint.
    pub fn close<H>(&mut self, surface: &mut H)
    where
        H: Surface + ?Sized,
    {
        surface.clear();
        self.matches = MatchSet::new();
        self.status = Status::Cleared;
        self.error = None;
    }

    fn show_current<H>(&mut self, surface: &mut H)
    where
        H: Surface + ?Sized,
    {
        let Some(current) = self.matches.current().copied() else {
            return;
        };
        surface.set_current(&current);
        surface.scroll_to_center(&current, self.scroll_behavior);
        if let Some((index, total)) = self.matches.position() {
            self.status = Status::Position { index, total };
        }
    }
}

fn collect<S>(compiled: &CompiledPatterns, source: &S) -> Vec<MatchSpan>
where
    S: TextSource + ?Sized,
{
    let matcher = compiled.matcher();
    let mut spans = Vec::new();
    for leaf in source.leaves() {
        if !leaf.is_searchable() {
            continue;
        }
        spans.extend(
            matcher
                .find_all(leaf.text)
                .map(|(start, end)| MatchSpan::new(leaf.node, start, end)),
        );
    }
    spans
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::document::{Document, Element, NodeId, TextLeaf};
    use crate::highlight::{ALL_LAYER, HighlightRegistry};

    fn body(texts: &[&str]) -> Document {
        let mut body = Element::new("body");
        for text in texts {
            body = body.child(Element::new("p").text(*text));
        }
        Document::new(body.into())
    }

    /// A synthetic leaf list, bypassing the element tree.
    struct Leaves(Vec<(&'static str, bool)>);

    impl TextSource for Leaves {
        fn leaves(&self) -> Box<dyn Iterator<Item = TextLeaf<'_>> + '_> {
            Box::new(
                self.0
                    .iter()
                    .enumerate()
                    .map(|(node, (text, skipped))| TextLeaf {
                        node,
                        text: *text,
                        skipped: *skipped,
                    }),
            )
        }

        fn leaf_text(&self, node: NodeId) -> Option<&str> {
            self.0.get(node).map(|(text, _)| *text)
        }
    }

    #[test]
    fn test_cat_and_dog_scenario() {
        let doc = body(&["A cat sat on a dog mat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();

        let status = navigator.search("cat\ndog", &doc, &mut surface);

        assert_eq!(status.to_string(), "1 / 2");
        assert_eq!(
            navigator.matches().spans(),
            &[MatchSpan::new(0, 2, 5), MatchSpan::new(0, 15, 18)]
        );
        assert_eq!(surface.layer(ALL_LAYER).len(), 2);
        assert_eq!(surface.current(), Some(&MatchSpan::new(0, 2, 5)));
        assert_eq!(
            surface.last_scroll(),
            Some(&(MatchSpan::new(0, 2, 5), ScrollBehavior::Smooth))
        );
    }

    #[test]
    fn test_single_astral_char_is_scanned() {
        let doc = body(&["😀", "é"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();

        let status = navigator.search(".", &doc, &mut surface);

        assert_eq!(status.to_string(), "1 / 1");
        assert_eq!(navigator.matches().spans(), &[MatchSpan::new(0, 0, 4)]);
    }

    #[test]
    fn test_invalid_scenario_clears_previous_paint() {
        let doc = body(&["A cat sat on a dog mat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("cat", &doc, &mut surface);
        assert!(!surface.is_clear());

        let status = navigator.search("[invalid(", &doc, &mut surface);

        assert_eq!(status, Status::Invalid);
        assert_eq!(status.to_string(), "Invalid regex");
        assert!(navigator.is_empty());
        assert_eq!(navigator.current_index(), None);
        assert!(surface.is_clear());
        assert!(navigator.error().is_some());
    }

    #[test]
    fn test_no_matches_scenario() {
        let doc = body(&["nothing to see here", "or here"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();

        let status = navigator.search("zzz-not-present", &doc, &mut surface);

        assert_eq!(status.to_string(), "No matches");
        assert!(surface.is_clear());
        assert!(surface.last_scroll().is_none());
    }

    #[test]
    fn test_blank_input_clears_status() {
        let doc = body(&["A cat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("cat", &doc, &mut surface);

        let status = navigator.search("  \n\n", &doc, &mut surface);

        assert_eq!(status, Status::Cleared);
        assert_eq!(status.to_string(), "");
        assert!(navigator.is_empty());
        assert!(surface.is_clear());
    }

    #[test]
    fn test_spans_follow_document_order() {
        let doc = body(&["dog cat", "cat", "x", "a dog and a cat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("cat\ndog", &doc, &mut surface);

        let spans = navigator.matches().spans();
        assert_eq!(spans.len(), 5);
        assert!(spans.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(spans[0], MatchSpan::new(0, 0, 3));
        assert_eq!(spans[1], MatchSpan::new(0, 4, 7));
    }

    #[test]
    fn test_skipped_and_short_leaves_never_match() {
        let source = Leaves(vec![
            ("cat in a script", true),
            ("c", false),
            ("ca", false),
            ("plain cat", false),
        ]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("c\\w*", &source, &mut surface);

        let nodes: Vec<NodeId> = navigator.matches().spans().iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![2, 3]);
    }

    #[test]
    fn test_empty_pattern_terminates() {
        let doc = body(&["abc", "de"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("x?", &doc, &mut surface);

        // One empty match per offset, end of node included.
        assert_eq!(navigator.len(), 4 + 3);
    }

    #[test]
    fn test_step_cycles_and_repaints_current_only() {
        let doc = body(&["cat", "cat", "cat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::new(SearchConfig::default())
            .with_scroll_behavior(ScrollBehavior::Instant);
        navigator.search("cat", &doc, &mut surface);
        let all_before = surface.layer(ALL_LAYER).to_vec();

        assert_eq!(navigator.step(Direction::Next, &mut surface).map(|s| s.node), Some(1));
        assert_eq!(navigator.status().to_string(), "2 / 3");
        assert_eq!(surface.current(), Some(&MatchSpan::new(1, 0, 3)));
        assert_eq!(surface.layer(ALL_LAYER), all_before.as_slice());
        assert_eq!(
            surface.last_scroll(),
            Some(&(MatchSpan::new(1, 0, 3), ScrollBehavior::Instant))
        );

        navigator.step(Direction::Previous, &mut surface);
        navigator.step(Direction::Previous, &mut surface);
        assert_eq!(navigator.status().to_string(), "3 / 3");
    }

    #[test]
    fn test_step_closure_in_both_directions() {
        let doc = body(&["one cat", "two cats", "three cats", "four cats"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("cat", &doc, &mut surface);
        navigator.step(Direction::Next, &mut surface);

        let start = navigator.current_index();
        for direction in [Direction::Next, Direction::Previous] {
            for _ in 0..navigator.len() {
                navigator.step(direction, &mut surface);
            }
            assert_eq!(navigator.current_index(), start);
        }
    }

    #[test]
    fn test_step_without_matches_is_noop() {
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        assert!(navigator.step(Direction::Next, &mut surface).is_none());
        assert!(navigator.step(Direction::Previous, &mut surface).is_none());
        assert_eq!(navigator.current_index(), None);
        assert_eq!(navigator.status(), Status::Cleared);
        assert!(surface.last_scroll().is_none());
    }

    #[test]
    fn test_recorder_sees_every_search() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let doc = body(&["A cat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default()
            .with_recorder(move |raw: &str| sink.borrow_mut().push(raw.to_string()));

        navigator.search("cat", &doc, &mut surface);
        navigator.search("[invalid(", &doc, &mut surface);
        navigator.search("", &doc, &mut surface);

        assert_eq!(*seen.borrow(), vec!["cat", "[invalid(", ""]);
    }

    #[test]
    fn test_close_drops_state() {
        let doc = body(&["A cat"]);
        let mut surface = HighlightRegistry::new();
        let mut navigator = Navigator::default();
        navigator.search("cat", &doc, &mut surface);

        navigator.close(&mut surface);

        assert!(navigator.is_empty());
        assert_eq!(navigator.status(), Status::Cleared);
        assert!(surface.is_clear());
    }
}
