//! # Maillots CLI (`maillots`)
//!
//! Ingests model images, browses the catalog, edits tags and serves the
//! HTTP API used by the browser client.
//!
//! ## Usage
//!
//! ```bash
//! maillots --config ./config/maillots.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `maillots ingest` | Copy source images and merge them into the catalog |
//! | `maillots serve` | Start the HTTP API |
//! | `maillots list` | Show the catalog in natural order |
//! | `maillots search "<query>"` | Ranked search by model number and tag |
//! | `maillots sample` | Show a few random models |
//! | `maillots tags set <model> "<tags>"` | Replace a model's tags |
//! | `maillots tags add <model> "<tags>"` | Add tags to a model |
//! | `maillots hash-password <secret>` | Print the digest for `edit_password_sha256` |
//!
//! ## Examples
//!
//! ```bash
//! # Preview an ingest without touching anything
//! maillots ingest --dry-run
//!
//! # Second page of models matching "12"
//! maillots search 12 --page 2
//!
//! # Tag a model from the shell
//! maillots tags add 12B "rojo, pedrería"
//!
//! # Serve on another port
//! PORT=8080 maillots serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use maillots_catalog::edit::TagEdit;
use maillots_catalog::{auth, browse, config, edit, ingest, server};

/// Maillots catalog manager.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used. See
/// `config/maillots.example.toml`.
#[derive(Parser)]
#[command(
    name = "maillots",
    about = "Catalog manager for a leotard collection: image ingestion, search and tag editing",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/maillots.toml`.
    #[arg(long, global = true, default_value = "./config/maillots.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Copy source images to the public directory and update the catalog.
    ///
    /// New model numbers are added with no tags, existing ones keep their
    /// tags and get their image path refreshed. The catalog is written back
    /// in natural order.
    Ingest {
        /// Show what would change without copying or writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the HTTP API.
    ///
    /// Binds to `[server].host:[server].port` (`PORT` overrides the port).
    Serve,

    /// Show the catalog in natural order.
    List {
        /// Page number (1-based).
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Search models by number and tag.
    ///
    /// Exact model matches come first, then prefix matches, then models
    /// containing the query, then tag matches.
    Search {
        /// Search query. Whitespace and case are ignored.
        query: String,

        /// Page number (1-based).
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Show a few random models.
    Sample {
        /// How many models to show (defaults to `[browse].sample_size`).
        #[arg(long)]
        count: Option<usize>,
    },

    /// Edit a model's tags directly in the catalog file.
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },

    /// Print the SHA-256 digest of a password for `[auth].edit_password_sha256`.
    HashPassword {
        /// The password to hash.
        secret: String,
    },
}

/// Tag editing subcommands.
#[derive(Subcommand)]
enum TagsAction {
    /// Replace all tags of a model.
    Set {
        /// Model number (e.g. `12B`).
        model: String,
        /// Comma-separated tags. Pass `""` to clear.
        tags: String,
    },
    /// Add tags to a model, skipping ones it already has.
    Add {
        /// Model number (e.g. `12B`).
        model: String,
        /// Comma-separated tags.
        tags: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::HashPassword { secret } = &cli.command {
        println!("{}", auth::hash_secret(secret));
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { dry_run } => {
            ingest::run_ingest(&cfg, dry_run).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::List { page } => {
            browse::run_list(&cfg, page).await?;
        }
        Commands::Search { query, page } => {
            browse::run_search(&cfg, &query, page).await?;
        }
        Commands::Sample { count } => {
            browse::run_sample(&cfg, count).await?;
        }
        Commands::Tags { action } => match action {
            TagsAction::Set { model, tags } => {
                edit::run_tags(&cfg, &model, &tags, TagEdit::Set).await?;
            }
            TagsAction::Add { model, tags } => {
                edit::run_tags(&cfg, &model, &tags, TagEdit::Add).await?;
            }
        },
        Commands::HashPassword { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
