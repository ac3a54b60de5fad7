//! Text-bearing leaves of a document, in depth-first order.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Document-order index of a text node.
pub type NodeId = usize;

/// `id` of the tool's own surface. Nothing inside it is ever searched.
pub const OVERLAY_ID: &str = "regex-search-overlay";

/// Text nodes shorter than this, in UTF-16 code units, are never scanned.
pub const MIN_TEXT_LEN: usize = 2;

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLeaf<'a> {
    pub node: NodeId,
    pub text: &'a str,
    /// Set when some ancestor is hidden, non-rendered or part of the overlay.
    pub skipped: bool,
}

impl TextLeaf<'_> {
    /// Whether a search scans this leaf at all.
    pub fn is_searchable(&self) -> bool {
        !self.skipped && self.text.encode_utf16().nth(MIN_TEXT_LEN - 1).is_some()
    }
}

pub trait TextSource {
    fn leaves(&self) -> Box<dyn Iterator<Item = TextLeaf<'_>> + '_>;

    fn leaf_text(&self, node: NodeId) -> Option<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn is_skippable(&self) -> bool {
        if SKIPPED_TAGS
            .iter()
            .any(|tag| self.tag.eq_ignore_ascii_case(tag))
        {
            return true;
        }
        if self.attrs.contains_key("hidden") {
            return true;
        }
        if self.attrs.get("aria-hidden").map(String::as_str) == Some("true") {
            return true;
        }
        self.attrs.get("id").map(String::as_str) == Some(OVERLAY_ID)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

#[derive(Debug, Clone)]
struct Leaf {
    text: String,
    skipped: bool,
}

/// An in-memory element/text tree, flattened once into its text leaves.
/// Only the subtree of the first `body` element is walked, or the whole
/// tree when there is none.
#[derive(Debug, Clone)]
pub struct Document {
    leaves: Vec<Leaf>,
}

impl Document {
    pub fn new(root: Node) -> Self {
        let mut leaves = Vec::new();
        match find_body(&root, false) {
            Some((body, skipped)) => collect(body, skipped, &mut leaves),
            None => collect(&root, false, &mut leaves),
        }
        Self { leaves }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let root: Node = serde_json::from_str(json)?;
        Ok(Self::new(root))
    }

    /// `.json` files are parsed as an element tree, anything else as plain text.
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let contents = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Ok(Self::from_plain_text(&contents));
        }
        Self::from_json(&contents).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Each blank-line separated paragraph becomes one `<p>` text node.
    pub fn from_plain_text(text: &str) -> Self {
        let mut body = Element::new("body");
        let mut paragraph: Vec<&str> = Vec::new();
        for line in text.lines().chain(std::iter::once("")) {
            if line.trim().is_empty() {
                if !paragraph.is_empty() {
                    body = body.child(Element::new("p").text(paragraph.join("\n")));
                    paragraph.clear();
                }
            } else {
                paragraph.push(line);
            }
        }
        Self::new(Node::Element(body))
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaf(&self, node: NodeId) -> Option<TextLeaf<'_>> {
        self.leaves.get(node).map(|leaf| TextLeaf {
            node,
            text: &leaf.text,
            skipped: leaf.skipped,
        })
    }
}

impl TextSource for Document {
    fn leaves(&self) -> Box<dyn Iterator<Item = TextLeaf<'_>> + '_> {
        Box::new(
            self.leaves
                .iter()
                .enumerate()
                .map(|(node, leaf)| TextLeaf {
                    node,
                    text: &leaf.text,
                    skipped: leaf.skipped,
                }),
        )
    }

    fn leaf_text(&self, node: NodeId) -> Option<&str> {
        self.leaves.get(node).map(|leaf| leaf.text.as_str())
    }
}

fn find_body(node: &Node, skipped: bool) -> Option<(&Node, bool)> {
    let Node::Element(element) = node else {
        return None;
    };
    let skipped = skipped || element.is_skippable();
    if element.tag.eq_ignore_ascii_case("body") {
        return Some((node, skipped));
    }
    element
        .children
        .iter()
        .find_map(|child| find_body(child, skipped))
}

fn collect(node: &Node, skipped: bool, out: &mut Vec<Leaf>) {
    match node {
        Node::Text(text) => out.push(Leaf {
            text: text.clone(),
            skipped,
        }),
        Node::Element(element) => {
            let skipped = skipped || element.is_skippable();
            for child in &element.children {
                collect(child, skipped, out);
            }
        }
    }
}
