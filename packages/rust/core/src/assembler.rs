//! Card assembler.
//!
//! Takes extracted post records, in their final order, and builds the
//! `card` trees handed to the renderer.

use tracing::{debug, instrument};

use blogcards_shared::{DEFAULT_LIMIT, Node, kind};

use crate::extractor::ExtractedDocument;

// ---------------------------------------------------------------------------
// Limit
// ---------------------------------------------------------------------------

/// Requested number of cards.
///
/// Any integer is accepted; values below one produce no cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(i64);

impl Limit {
    /// Wrap a requested card count.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The raw requested value.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Number of cards to keep, clamped at zero.
    pub fn count(self) -> usize {
        usize::try_from(self.0).unwrap_or(0)
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

impl From<i64> for Limit {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build cards for `documents` and keep the first `limit` of them.
///
/// Input order is preserved; truncation always takes a prefix.
#[instrument(skip_all, fields(documents = documents.len(), limit = limit.get()))]
pub fn assemble(documents: &[ExtractedDocument], limit: Limit) -> Vec<Node> {
    let cards: Vec<Node> = documents
        .iter()
        .take(limit.count())
        .map(assemble_card)
        .collect();

    debug!(cards = cards.len(), "assembled cards");
    cards
}

/// Build a single `card` node.
///
/// Children are always ordered title, subtitle, description, footer; only
/// the title block is unconditional.
pub fn assemble_card(document: &ExtractedDocument) -> Node {
    let mut children = Vec::with_capacity(4);

    children.push(Node::parent(kind::CARD_TITLE, document.title.clone()));
    children.extend(document.subtitle.iter().cloned());
    children.extend(document.description.iter().cloned());
    children.extend(footer(document.frontmatter.date.as_deref()));

    Node::parent(kind::CARD, children).with_url(derive_url(&document.source.path))
}

/// `footer > paragraph > text("Date: …")` for a non-empty date.
fn footer(date: Option<&str>) -> Option<Node> {
    let date = date.filter(|d| !d.is_empty())?;
    let paragraph = Node::parent(kind::PARAGRAPH, vec![Node::text(format!("Date: {date}"))]);
    Some(Node::parent(kind::FOOTER, vec![paragraph]))
}

/// Link target for a post: `/` + the relative path without its extension.
///
/// `posts/a.md` becomes `/posts/a`. A dot that starts the file name (as in
/// `.profile`) is not an extension.
pub fn derive_url(path: &str) -> String {
    let path = path.trim_start_matches('/');
    let name_start = path.rfind('/').map_or(0, |i| i + 1);

    let stem = match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    };

    format!("/{stem}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
