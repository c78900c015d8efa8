//! Card extraction pipeline for blogcards.
//!
//! This crate ties together post location, frontmatter extraction, and card
//! assembly into a single pass (`collect_cards`). The markup parser is
//! injected through [`blogcards_shared::MarkupParser`]; nothing here depends
//! on a concrete parser.

pub mod assembler;
pub mod directive;
pub mod extractor;
pub mod frontmatter;
pub mod locator;
pub mod ordering;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::{Limit, assemble, assemble_card, derive_url};
pub use directive::{BLOG_POSTS_DIRECTIVE, DirectiveDescriptor, DirectiveOptions, run_directive};
pub use extractor::{ExtractedDocument, extract, map_optional_fragment};
pub use locator::{SourceDocument, locate};
pub use pipeline::{CardsRequest, collect_cards, collect_cards_concurrent};
