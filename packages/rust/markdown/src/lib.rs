//! CommonMark parsing into blogcards syntax trees.
//!
//! Provides [`CommonMarkParser`], the default [`MarkupParser`] handed to the
//! card pipeline. Parsing is done by `pulldown-cmark` with YAML metadata
//! blocks enabled, so a post's leading `---` block comes back as a `yaml`
//! node that the frontmatter reader can pick up.

mod tree;

use pulldown_cmark::{Options, Parser};
use tracing::{instrument, trace};

use blogcards_shared::{MarkupParser, Node, Result};

use crate::tree::TreeBuilder;

/// `pulldown-cmark` backed [`MarkupParser`].
#[derive(Debug, Clone, Copy)]
pub struct CommonMarkParser {
    options: Options,
}

impl Default for CommonMarkParser {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        Self { options }
    }
}

impl CommonMarkParser {
    /// Parser with the default extension set.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkupParser for CommonMarkParser {
    #[instrument(level = "trace", skip_all, fields(len = text.len()))]
    fn parse(&self, text: &str) -> Result<Node> {
        let mut builder = TreeBuilder::new();
        for event in Parser::new_ext(text, self.options) {
            builder.push_event(event)?;
        }
        let root = builder.finish()?;
        trace!(children = root.children.len(), "parsed markup");
        Ok(root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
