//! Per-post metadata extraction.
//!
//! Reads one source file, parses it with the injected [`MarkupParser`], and
//! pre-parses the title as an inline fragment and the subtitle and
//! description as block fragments.

use tracing::{debug, instrument};

use blogcards_shared::{BlogCardsError, Frontmatter, MarkupParser, Node, Result, kind};

use crate::frontmatter;
use crate::locator::SourceDocument;

/// Everything the assembler needs to build one card.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// The post this record came from.
    pub source: SourceDocument,
    /// Recognized frontmatter fields.
    pub frontmatter: Frontmatter,
    /// Parsed title children (empty when the title is absent).
    pub title: Vec<Node>,
    /// Parsed subtitle blocks (empty when absent).
    pub subtitle: Vec<Node>,
    /// Parsed description blocks (empty when absent).
    pub description: Vec<Node>,
}

/// Read and parse a single post.
///
/// I/O failures surface as [`BlogCardsError::Io`]; parse failures as
/// [`BlogCardsError::Parse`] prefixed with the post path.
#[instrument(skip_all, fields(path = %source.path))]
pub fn extract(parser: &dyn MarkupParser, source: SourceDocument) -> Result<ExtractedDocument> {
    let content = std::fs::read_to_string(&source.file)
        .map_err(|e| BlogCardsError::io(&source.file, e))?;

    let (frontmatter, title, subtitle, description) =
        parse_fields(parser, &content).map_err(|e| with_path(&source.path, e))?;

    debug!(
        has_title = !title.is_empty(),
        has_subtitle = !subtitle.is_empty(),
        has_description = !description.is_empty(),
        date = frontmatter.date.as_deref().unwrap_or(""),
        "extracted post metadata"
    );

    Ok(ExtractedDocument {
        source,
        frontmatter,
        title,
        subtitle,
        description,
    })
}

type Fields = (Frontmatter, Vec<Node>, Vec<Node>, Vec<Node>);

fn parse_fields(parser: &dyn MarkupParser, content: &str) -> Result<Fields> {
    let tree = parser.parse(content)?;
    let frontmatter = frontmatter::from_tree(&tree)?;

    // The title is always parsed so that an absent title still yields a block.
    let title = parse_inline(parser, frontmatter.title.as_deref().unwrap_or_default())?;
    let subtitle = map_optional_fragment(parser, frontmatter.subtitle.as_deref())?;
    let description = map_optional_fragment(parser, frontmatter.description.as_deref())?;

    Ok((frontmatter, title, subtitle, description))
}

/// Parse an optional field value as a block fragment.
///
/// Absent or empty values contribute nothing; present values contribute the
/// fragment root's children as-is, so each field stays a separate block.
pub fn map_optional_fragment(parser: &dyn MarkupParser, value: Option<&str>) -> Result<Vec<Node>> {
    match value {
        Some(text) if !text.is_empty() => Ok(parser.parse(text)?.children),
        _ => Ok(Vec::new()),
    }
}

/// Parse `text` and return its inline children.
///
/// A fragment that parses to a single paragraph is unwrapped, so `"A *b*"`
/// yields `[text, emphasis]` rather than `[paragraph]`.
pub fn parse_inline(parser: &dyn MarkupParser, text: &str) -> Result<Vec<Node>> {
    let root = parser.parse(text)?;
    let mut children = root.children;

    if children.len() == 1 && children[0].is(kind::PARAGRAPH) {
        if let Some(paragraph) = children.pop() {
            return Ok(paragraph.children);
        }
    }
    Ok(children)
}

fn with_path(path: &str, err: BlogCardsError) -> BlogCardsError {
    match err {
        BlogCardsError::Parse { message } => BlogCardsError::parse(format!("{path}: {message}")),
        other => other,
    }
}
