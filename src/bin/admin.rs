//! CLI administration tool for linkify.
//!
//! Provides commands for managing the search index, creating and inspecting
//! links, and checking store connectivity without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create the search index if it does not exist
//! cargo run --bin admin -- index create
//!
//! # Drop the index definition (records are kept)
//! cargo run --bin admin -- index drop
//!
//! # Create a link
//! cargo run --bin admin -- link create https://example.com/page my-link
//!
//! # Show a link and its visit count
//! cargo run --bin admin -- link show my-link
//!
//! # Check store connection
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST` (required): Redis Stack connection
//! - `REDIS_INDEX`, `BASE_URL`, `STORE_TIMEOUT_MS`: as for the server

use linkify::application::services::ShorteningService;
use linkify::config::{self, Config};
use linkify::domain::repositories::LinkRepository;
use linkify::infrastructure::persistence::{RedisLinkRepository, RedisStoreOptions};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing linkify.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the search index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// Create and inspect links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Search index subcommands.
#[derive(Subcommand)]
enum IndexAction {
    /// Create the index if it does not exist
    Create,

    /// Drop the index definition, keeping the records
    Drop {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Map an alias to a target URL
    Create {
        /// Target URL (e.g., "https://example.com/page")
        url: String,

        /// Alias: 5-50 characters from A-Z, a-z, 0-9, '-' and '_'
        alias: String,
    },

    /// Show the target and visit count of an alias
    Show {
        alias: String,
    },
}

/// Store subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let repo = Arc::new(connect(&config).await?);

    match cli.command {
        Commands::Index { action } => handle_index_action(action, &repo).await?,
        Commands::Link { action } => handle_link_action(action, repo, &config).await?,
        Commands::Store { action } => handle_store_action(action, &repo).await?,
    }

    Ok(())
}

/// Connects to the configured Redis instance.
async fn connect(config: &Config) -> Result<RedisLinkRepository> {
    let redis_url = config
        .redis_url
        .as_deref()
        .context("REDIS_URL or REDIS_HOST must be set")?;

    let options = RedisStoreOptions {
        index_name: config.redis_index.clone(),
        operation_timeout: config.store_timeout(),
    };

    RedisLinkRepository::connect(redis_url, options)
        .await
        .context("Failed to connect to Redis")
}

/// Dispatches search index commands.
async fn handle_index_action(action: IndexAction, repo: &RedisLinkRepository) -> Result<()> {
    match action {
        IndexAction::Create => {
            println!("{}", "🗂️  Create Search Index".bright_blue().bold());
            println!();

            let created = repo
                .ensure_index()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create index: {}", e))?;

            if created {
                println!(
                    "{} {}",
                    "✅ Index created:".green().bold(),
                    repo.index_name().cyan()
                );
            } else {
                println!(
                    "{} {}",
                    "ℹ️  Index already exists:".yellow(),
                    repo.index_name().cyan()
                );
            }
        }
        IndexAction::Drop { yes } => {
            println!("{}", "🗑️  Drop Search Index".bright_blue().bold());
            println!();
            println!("  Index: {}", repo.index_name().cyan());
            println!(
                "{}",
                "  Link records are kept, but aliases cannot be resolved until the index is recreated."
                    .yellow()
            );
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Drop this index?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            repo.drop_index()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to drop index: {}", e))?;

            println!();
            println!("{}", "✅ Index dropped".green().bold());
        }
    }

    println!();
    Ok(())
}

/// Runs link operations through the same service the HTTP API uses.
async fn handle_link_action(
    action: LinkAction,
    repo: Arc<RedisLinkRepository>,
    config: &Config,
) -> Result<()> {
    let service = ShorteningService::new(repo, config.base_url.clone());

    match action {
        LinkAction::Create { url, alias } => {
            println!("{}", "🔗 Create Link".bright_blue().bold());
            println!();

            let shortened = service
                .create_short_link(&url, &alias)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

            println!("{}", "✅ Link created successfully!".green().bold());
            println!();
            println!("  Alias:     {}", shortened.alias.cyan());
            println!("  Target:    {}", url.bright_white());
            println!("  Short URL: {}", shortened.short_url.bright_yellow().bold());
        }
        LinkAction::Show { alias } => {
            println!("{}", "🔎 Link Details".bright_blue().bold());
            println!();

            let record = service
                .get_link(&alias)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load link: {}", e))?;

            println!("  Alias:     {}", record.alias.cyan());
            println!("  Target:    {}", record.target_url.bright_white());
            println!(
                "  Visits:    {}",
                record.visits.to_string().bright_green().bold()
            );
            println!("  Short URL: {}", service.short_url(&record.alias).bright_yellow());
            println!("  Record id: {}", record.id.bright_black());
        }
    }

    println!();
    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, repo: &RedisLinkRepository) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking store connection...".bright_blue());

            if !repo.health_check().await {
                anyhow::bail!("Store did not answer PING");
            }

            println!("{}", "✅ Store connection OK".green().bold());
        }
    }

    Ok(())
}
