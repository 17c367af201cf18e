//! C1 CLI - Inspect permission ancestry from the command line
//!
//! Loads a hierarchy file, builds the relationship graphs for a token and
//! prints what they found.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "c1")]
#[command(author = "C1 Contributors")]
#[command(version)]
#[command(about = "Resolve who can act on what in a C1 security hierarchy", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration to .c1/config.json
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Expand the level graph of a token
    Levels {
        /// Hierarchy JSON file
        hierarchy: PathBuf,

        /// Entity token as type:source:id
        token: String,

        /// Sources to consult: native, hooked or both
        #[arg(short, long)]
        search: Option<String>,

        /// Expand lazily, only up to this level
        #[arg(short, long)]
        depth: Option<usize>,

        /// User name for cache keys (overrides the hierarchy file)
        #[arg(short, long)]
        user: Option<String>,

        /// Use the persistent parent cache
        #[arg(long)]
        cache: bool,

        /// Cache directory (implies --cache)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Print the raw level dump
        #[arg(long)]
        raw: bool,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List every ancestor path of a token
    Paths {
        /// Hierarchy JSON file
        hierarchy: PathBuf,

        /// Entity token as type:source:id
        token: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Manage the persistent parent cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop every cached lookup
    Clear {
        /// Cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Show where the cache lives and how many entries it holds
    Status {
        /// Cache directory
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Levels {
            hierarchy,
            token,
            search,
            depth,
            user,
            cache,
            cache_dir,
            raw,
            json,
        } => commands::levels(commands::LevelsArgs {
            hierarchy: &hierarchy,
            token: &token,
            search: search.as_deref(),
            depth,
            user,
            cache: cache || cache_dir.is_some(),
            cache_dir,
            raw,
            json,
        }),
        Commands::Paths {
            hierarchy,
            token,
            json,
        } => commands::paths(&hierarchy, &token, json),
        Commands::Cache { action } => match action {
            CacheAction::Clear { cache_dir } => commands::cache_clear(cache_dir),
            CacheAction::Status { cache_dir } => commands::cache_status(cache_dir),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
