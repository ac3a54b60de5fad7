//! Regex match collection and navigation over a document's text.

mod activation;
mod compiler;
mod document;
mod error;
mod highlight;
mod matcher;
mod navigator;

pub use activation::Activation;
pub use compiler::{
    CombinedMatcher, CompiledPatterns, LineCheck, Matches, PatternSet, SearchConfig, SearchMode,
    check_lines, compile,
};
pub use document::{
    Document, Element, MIN_TEXT_LEN, Node, NodeId, OVERLAY_ID, TextLeaf, TextSource,
};
pub use error::{DocumentError, SearchError};
pub use highlight::{ALL_LAYER, CURRENT_LAYER, HighlightRegistry, ScrollBehavior, Surface};
pub use matcher::{Direction, MatchSet, MatchSpan};
pub use navigator::{Navigator, QueryRecorder, Status};
