//! Test helpers shared across core modules.

use std::path::Path;

use blogcards_markdown::CommonMarkParser;
use blogcards_shared::{BlogCardsError, MarkupParser, Node, Result};

use crate::extractor::{ExtractedDocument, extract};
use crate::locator::SourceDocument;

/// Write `content` to `root/rel`, creating parent directories.
pub(crate) fn write_post(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Post source with a frontmatter block built from `fields`.
pub(crate) fn post(fields: &[(&str, &str)], body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Write a post and run it through the extractor.
pub(crate) fn extracted(root: &Path, rel: &str, fields: &[(&str, &str)]) -> ExtractedDocument {
    write_post(root, rel, &post(fields, "Body text.\n"));
    extract(&CommonMarkParser::new(), SourceDocument::new(root, rel)).unwrap()
}

/// Parser that rejects any text containing `marker`.
pub(crate) struct RejectingParser {
    pub(crate) marker: &'static str,
}

impl MarkupParser for RejectingParser {
    fn parse(&self, text: &str) -> Result<Node> {
        if text.contains(self.marker) {
            return Err(BlogCardsError::parse(format!("rejected '{}'", self.marker)));
        }
        CommonMarkParser::new().parse(text)
    }
}
