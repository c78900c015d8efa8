//! Shared types, error model, and configuration for blogcards.
//!
//! This crate is the foundation depended on by all other blogcards crates.
//! It provides:
//! - [`BlogCardsError`], the unified error type
//! - The syntax tree ([`Node`]), the [`Frontmatter`] record, and the
//!   [`MarkupParser`] capability injected into the pipeline
//! - Configuration ([`AppConfig`], [`CardsConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CardsConfig, DEFAULT_LIMIT, DEFAULT_PATTERN, DefaultsConfig, FailurePolicy,
    SortOrder, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{BlogCardsError, Result};
pub use types::{Frontmatter, MarkupParser, Node, kind};
