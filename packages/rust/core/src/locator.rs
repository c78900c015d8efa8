//! Post source discovery.
//!
//! Finds the files matching the post pattern under a site root and returns
//! them in plain lexical order of their relative path.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use glob::{MatchOptions, Pattern};
use tracing::{debug, instrument};

use blogcards_shared::{BlogCardsError, Result};

/// A post source file found by [`locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path relative to the site root, `/`-separated (e.g. `posts/a.md`).
    pub path: String,
    /// Filesystem location used for reading.
    pub file: PathBuf,
    /// Modification time, when the filesystem reports one.
    pub modified: Option<SystemTime>,
}

impl SourceDocument {
    /// Build a document for `path` relative to `root`.
    pub fn new(root: &Path, path: impl Into<String>) -> Self {
        let path = path.into();
        let file = root.join(&path);
        let modified = std::fs::metadata(&file).and_then(|m| m.modified()).ok();
        Self {
            path,
            file,
            modified,
        }
    }
}

/// Enumerate files under `root` matching `pattern`, sorted by relative path.
///
/// A missing or unreadable location is not an error: it simply yields no
/// documents. Only a malformed `pattern` fails.
#[instrument(skip_all, fields(root = %root.display(), pattern = %pattern))]
pub fn locate(root: &Path, pattern: &str) -> Result<Vec<SourceDocument>> {
    let base = if root.as_os_str().is_empty() {
        ".".into()
    } else {
        root.to_string_lossy()
    };
    let full = format!(
        "{}/{}",
        Pattern::escape(&base).trim_end_matches('/'),
        pattern.trim_start_matches('/')
    );

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let entries = glob::glob_with(&full, options)
        .map_err(|e| BlogCardsError::config(format!("invalid post pattern '{pattern}': {e}")))?;

    let mut documents = Vec::new();
    for entry in entries {
        let file = match entry {
            Ok(file) => file,
            Err(e) => {
                debug!(error = %e, "skipping unreadable glob entry");
                continue;
            }
        };

        if !file.is_file() {
            continue;
        }

        documents.push(SourceDocument::new(root, relative_path(root, &file)));
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(count = documents.len(), "located post sources");
    Ok(documents)
}

/// Express `file` relative to `root` with `/` separators.
fn relative_path(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
