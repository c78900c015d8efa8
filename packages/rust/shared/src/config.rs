//! Application configuration for blogcards.
//!
//! User config lives at `~/.blogcards/blogcards.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BlogCardsError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogcards.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogcards";

/// Number of cards produced when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: i64 = 3;

/// Location pattern for post sources, relative to the site root.
pub const DEFAULT_PATTERN: &str = "posts/*.md";

// ---------------------------------------------------------------------------
// Policy enums
// ---------------------------------------------------------------------------

/// How located documents are ordered before truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Plain code-point order of the relative path string.
    #[default]
    Lexical,
    /// Newest frontmatter `date` first; undated documents last.
    #[serde(rename = "date")]
    DeclaredDate,
    /// Newest file modification time first.
    Modified,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lexical => "lexical",
            Self::DeclaredDate => "date",
            Self::Modified => "modified",
        };
        f.write_str(name)
    }
}

impl FromStr for SortOrder {
    type Err = BlogCardsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lexical" => Ok(Self::Lexical),
            "date" => Ok(Self::DeclaredDate),
            "modified" | "mtime" => Ok(Self::Modified),
            other => Err(BlogCardsError::config(format!(
                "unknown order '{other}': expected 'lexical', 'date', or 'modified'"
            ))),
        }
    }
}

/// What happens when a single document cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// The first failing document aborts the whole batch.
    #[default]
    #[serde(rename = "fail")]
    FailFast,
    /// Failing documents are logged and left out.
    Skip,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FailFast => "fail",
            Self::Skip => "skip",
        })
    }
}

impl FromStr for FailurePolicy {
    type Err = BlogCardsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::FailFast),
            "skip" => Ok(Self::Skip),
            other => Err(BlogCardsError::config(format!(
                "unknown failure policy '{other}': expected 'fail' or 'skip'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Config structs (matching blogcards.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Card selection settings.
    #[serde(default)]
    pub cards: CardsSection,

    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[cards]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardsSection {
    /// Maximum number of cards. Values below one produce no cards.
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Glob for post sources, relative to the site root.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Ordering applied before truncation.
    #[serde(default)]
    pub order: SortOrder,

    /// Per-document failure handling.
    #[serde(default)]
    pub on_error: FailurePolicy,
}

impl Default for CardsSection {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            pattern: default_pattern(),
            order: SortOrder::default(),
            on_error: FailurePolicy::default(),
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}
fn default_pattern() -> String {
    DEFAULT_PATTERN.into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum documents extracted at once by the concurrent pipeline.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> u32 {
    4
}

// ---------------------------------------------------------------------------
// Cards config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime card configuration, merged from config file + CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct CardsConfig {
    /// Requested number of cards.
    pub limit: i64,
    /// Glob for post sources, relative to the site root.
    pub pattern: String,
    /// Ordering applied before truncation.
    pub order: SortOrder,
    /// Per-document failure handling.
    pub on_error: FailurePolicy,
    /// Extraction concurrency for the async pipeline.
    pub concurrency: u32,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CardsConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            limit: config.cards.limit,
            pattern: config.cards.pattern.clone(),
            order: config.cards.order,
            on_error: config.cards.on_error,
            concurrency: config.defaults.concurrency,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogcards/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlogCardsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogcards/blogcards.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlogCardsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BlogCardsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BlogCardsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlogCardsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlogCardsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
