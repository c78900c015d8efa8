//! Syntax tree, frontmatter record, and the parser capability.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;

/// Node kind tags used in the tree.
///
/// Parser-produced kinds follow mdast naming; the card kinds are the ones
/// emitted by the card assembler.
pub mod kind {
    pub const ROOT: &str = "root";
    pub const YAML: &str = "yaml";
    pub const PARAGRAPH: &str = "paragraph";
    pub const TEXT: &str = "text";

    pub const CARD: &str = "card";
    pub const CARD_TITLE: &str = "cardTitle";
    pub const FOOTER: &str = "footer";

    /// Kinds that never carry children.
    pub const LEAVES: [&str; 9] = [
        TEXT,
        YAML,
        "inlineCode",
        "code",
        "html",
        "break",
        "thematicBreak",
        "image",
        "footnoteReference",
    ];
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node in a parsed document or card tree.
///
/// Serializes mdast-style: parent kinds always carry `children`, even when
/// empty; leaf kinds never do.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Node {
    /// Kind tag (`paragraph`, `card`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Child nodes, in document order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Literal content for leaf kinds (`text`, `inlineCode`, `yaml`, ...).
    #[serde(default)]
    pub value: Option<String>,
    /// Link target for `link`, `image`, and `card` nodes.
    #[serde(default)]
    pub url: Option<String>,
    /// Kind-specific attributes (heading `depth`, code `lang`, ...).
    #[serde(flatten)]
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.kind)?;
        if !self.is_leaf() || !self.children.is_empty() {
            map.serialize_entry("children", &self.children)?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", value)?;
        }
        if let Some(url) = &self.url {
            map.serialize_entry("url", url)?;
        }
        for (key, value) in &self.attrs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Node {
    /// Create an empty node of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Create a parent node with the given children.
    pub fn parent(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    /// Create a `text` leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind::TEXT)
        }
    }

    /// Builder-style setter for `url`.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder-style setter for an extra attribute.
    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Whether this node's kind is a leaf kind (see [`kind::LEAVES`]).
    pub fn is_leaf(&self) -> bool {
        kind::LEAVES.contains(&self.kind.as_str())
    }

    /// Whether this node has the given kind.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Concatenated `text` values of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    if node.is(kind::TEXT) {
        if let Some(value) = &node.value {
            out.push_str(value);
        }
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

// ---------------------------------------------------------------------------
// Frontmatter
// ---------------------------------------------------------------------------

/// The metadata fields recognized in a post's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form; never reformatted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// MarkupParser
// ---------------------------------------------------------------------------

/// Host capability that turns markup text into a syntax tree.
///
/// Used both for whole documents and for single frontmatter values. The
/// returned node is a `root`; a document's frontmatter appears as a leading
/// `yaml` child whose `value` holds the raw block.
pub trait MarkupParser: Send + Sync {
    /// Parse `text` into a `root` node.
    fn parse(&self, text: &str) -> Result<Node>;
}
