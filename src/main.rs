//! # tmem CLI
//!
//! The `tmem` binary is the primary interface to the translation memory.
//!
//! ## Usage
//!
//! ```bash
//! tmem --config ./config/tmem.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tmem init` | Create the SQLite database and schema |
//! | `tmem translate <file>` | Translate a document, reusing stored segments |
//! | `tmem text <text>` | Translate a single ad-hoc snippet |
//! | `tmem similar <file>` | Rank stored documents by similarity to a file |
//! | `tmem history` | Show the translation history |
//! | `tmem stats` | Show document/translation/reuse statistics |
//! | `tmem get <id>` | Show a stored document by id |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tmem::config;
use tmem::get;
use tmem::history;
use tmem::progress::ProgressMode;
use tmem::similar;
use tmem::stats;
use tmem::store::TranslationStore;
use tmem::translate_cmd;

/// tmem — a local-first translation memory engine with segment-level reuse.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/tmem.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "tmem",
    about = "tmem — a local-first translation memory engine with segment-level reuse",
    version,
    long_about = "tmem persists translated documents and segments in SQLite, deduplicates \
    documents by content hash, and reuses previously translated segments by textual \
    similarity, so the (pluggable) translation backend is only called for genuinely new text."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/tmem.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all required tables
    /// (documents, translations, segments). Idempotent — running it
    /// multiple times is safe.
    Init,

    /// Translate a document file.
    ///
    /// Registers the document (deduplicated by hash), splits it into
    /// segments, reuses stored translations where similar enough, and
    /// sends the rest to the configured backend. The result is stored as
    /// a new translation version.
    Translate {
        /// Path to the document (plain text).
        file: PathBuf,

        /// Language pair: fr-en, en-fr, en-es, or es-en.
        #[arg(long)]
        pair: String,

        /// Write the translated text to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Progress reporting: off, human, or json.
        /// Defaults to human when stderr is a TTY.
        #[arg(long)]
        progress: Option<String>,
    },

    /// Translate a single ad-hoc text snippet.
    ///
    /// Unlike document translation, a backend failure here degrades
    /// gracefully: the source text is printed unchanged.
    Text {
        /// The text to translate.
        text: String,

        /// Language pair: fr-en, en-fr, en-es, or es-en.
        #[arg(long)]
        pair: String,
    },

    /// Rank stored documents by similarity to a file.
    Similar {
        /// Path to the document to compare against the memory.
        file: PathBuf,

        /// Minimum similarity score in [0, 1].
        /// Defaults to reuse.document_threshold from the config.
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Show the translation history, most recent first.
    History,

    /// Show document, translation, and reuse statistics.
    Stats,

    /// Show a stored document by id.
    Get {
        /// Document id as printed by `similar` or `history`.
        id: i64,
    },
}

fn parse_progress(raw: Option<&str>) -> anyhow::Result<ProgressMode> {
    match raw {
        None | Some("auto") => Ok(ProgressMode::default_for_tty()),
        Some("off") => Ok(ProgressMode::Off),
        Some("human") => Ok(ProgressMode::Human),
        Some("json") => Ok(ProgressMode::Json),
        Some(other) => anyhow::bail!("Unknown progress mode: {}. Use off, human, or json.", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let store = TranslationStore::open(&config).await?;
            store.close().await;
            println!("initialized {}", config.db.path.display());
        }
        Commands::Translate {
            file,
            pair,
            output,
            progress,
        } => {
            let mode = parse_progress(progress.as_deref())?;
            translate_cmd::run_translate(&config, &file, &pair, output.as_deref(), mode).await?;
        }
        Commands::Text { text, pair } => {
            translate_cmd::run_text(&config, &text, &pair).await?;
        }
        Commands::Similar { file, threshold } => {
            similar::run_similar(&config, &file, threshold).await?;
        }
        Commands::History => {
            history::run_history(&config).await?;
        }
        Commands::Stats => {
            stats::run_stats(&config).await?;
        }
        Commands::Get { id } => {
            get::run_get(&config, id).await?;
        }
    }

    Ok(())
}
