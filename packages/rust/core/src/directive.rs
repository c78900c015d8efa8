//! The `blog-posts` directive: descriptor and host-facing entry point.
//!
//! A host renderer registers [`BLOG_POSTS_DIRECTIVE`], hands the directive's
//! option map to [`DirectiveOptions::from_json`], and calls
//! [`run_directive`] to get the cards to splice into the page.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use blogcards_shared::{BlogCardsError, CardsConfig, MarkupParser, Node, Result};

use crate::assembler::Limit;
use crate::pipeline::{CardsRequest, collect_cards};

/// Static description of a directive, as registered with a host.
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveDescriptor {
    pub name: &'static str,
    pub doc: &'static str,
    pub options: &'static [DirectiveOption],
}

/// One option accepted by a directive.
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveOption {
    pub name: &'static str,
    /// Host-side value type (`Number`, `String`, ...).
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub doc: &'static str,
}

/// Descriptor for the `blog-posts` directive.
pub const BLOG_POSTS_DIRECTIVE: DirectiveDescriptor = DirectiveDescriptor {
    name: "blog-posts",
    doc: "Display preview cards for documents.",
    options: &[DirectiveOption {
        name: "limit",
        kind: "Number",
        doc: "Number of posts.",
    }],
};

/// Options supplied to a `blog-posts` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveOptions {
    pub limit: Limit,
}

impl DirectiveOptions {
    /// Read options from the host's JSON option map.
    ///
    /// A missing or `null` limit falls back to the default; floats are
    /// truncated toward zero. A non-numeric limit is a config error.
    pub fn from_json(options: &Value) -> Result<Self> {
        let limit = match options {
            Value::Null => None,
            Value::Object(map) => map.get("limit"),
            _ => {
                return Err(BlogCardsError::config(
                    "blog-posts options must be an object",
                ));
            }
        };

        let limit = match limit {
            None | Some(Value::Null) => Limit::default(),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Limit::new(i),
                // u64 beyond i64::MAX or a float; `as` saturates.
                None => Limit::new(n.as_f64().unwrap_or_default() as i64),
            },
            Some(other) => {
                return Err(BlogCardsError::config(format!(
                    "blog-posts option 'limit' must be a number, got {other}"
                )));
            }
        };

        Ok(Self { limit })
    }
}

/// Execute the directive against the site at `root`.
///
/// Uses the default post pattern, lexical ordering, and fail-fast policy.
#[instrument(skip_all, fields(root = %root.display(), limit = options.limit.get()))]
pub fn run_directive(
    parser: &dyn MarkupParser,
    root: &Path,
    options: &DirectiveOptions,
) -> Result<Vec<Node>> {
    let request = CardsRequest {
        root: root.to_path_buf(),
        cards: CardsConfig {
            limit: options.limit.get(),
            ..CardsConfig::default()
        },
    };
    collect_cards(parser, &request)
}
