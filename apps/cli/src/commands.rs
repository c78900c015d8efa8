//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use tracing::info;

use blogcards_core::pipeline::{CardsRequest, collect_cards, collect_cards_concurrent};
use blogcards_core::BLOG_POSTS_DIRECTIVE;
use blogcards_markdown::CommonMarkParser;
use blogcards_shared::{
    AppConfig, CardsConfig, FailurePolicy, MarkupParser, SortOrder, init_config, load_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// blogcards: preview cards for a directory of posts.
#[derive(Parser)]
#[command(
    name = "blogcards",
    version,
    about = "Extract preview cards from a directory of Markdown posts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.blogcards/blogcards.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the cards for a site as JSON.
    Cards(CardsArgs),

    /// Print the `blog-posts` directive descriptor as JSON.
    Directive,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `blogcards cards`; each overrides the config file.
#[derive(clap::Args, Debug)]
pub(crate) struct CardsArgs {
    /// Site root containing the posts directory.
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Maximum number of cards (values below one print nothing).
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Post glob, relative to the root.
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Ordering: lexical, date, or modified.
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Failure handling: fail or skip.
    #[arg(long)]
    pub on_error: Option<FailurePolicy>,

    /// Posts extracted at once; 1 runs sequentially.
    #[arg(long)]
    pub concurrency: Option<u32>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// only command output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogcards=info",
        1 => "blogcards=debug",
        _ => "blogcards=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Cards(args) => {
            let config = resolve_config(cli.config.as_ref())?;
            cmd_cards(&config, args).await
        }
        Command::Directive => cmd_directive(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => {
                let config = resolve_config(cli.config.as_ref())?;
                cmd_config_show(&config)
            }
        },
    }
}

fn resolve_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Merge CLI flags over the loaded config.
fn cards_config(config: &AppConfig, args: &CardsArgs) -> CardsConfig {
    let mut cards = CardsConfig::from(config);
    if let Some(limit) = args.limit {
        cards.limit = limit;
    }
    if let Some(pattern) = &args.pattern {
        cards.pattern = pattern.clone();
    }
    if let Some(order) = args.order {
        cards.order = order;
    }
    if let Some(on_error) = args.on_error {
        cards.on_error = on_error;
    }
    if let Some(concurrency) = args.concurrency {
        cards.concurrency = concurrency;
    }
    cards
}

async fn cmd_cards(config: &AppConfig, args: CardsArgs) -> Result<()> {
    if !args.root.is_dir() {
        return Err(eyre!("site root '{}' is not a directory", args.root.display()));
    }

    let request = CardsRequest {
        cards: cards_config(config, &args),
        root: args.root,
    };

    info!(
        root = %request.root.display(),
        limit = request.cards.limit,
        pattern = %request.cards.pattern,
        order = %request.cards.order,
        on_error = %request.cards.on_error,
        "collecting cards"
    );

    let cards = if request.cards.concurrency > 1 {
        let parser: Arc<dyn MarkupParser> = Arc::new(CommonMarkParser::new());
        collect_cards_concurrent(parser, &request).await?
    } else {
        collect_cards(&CommonMarkParser::new(), &request)?
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&cards)?
    } else {
        serde_json::to_string(&cards)?
    };
    println!("{json}");

    Ok(())
}

fn cmd_directive() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&BLOG_POSTS_DIRECTIVE)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
