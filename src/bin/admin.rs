//! CLI administration tool for shortlink-resolver.
//!
//! Manages short links directly against the database and cache, without
//! going through the HTTP API. Uses the same [`LinkService`] as the server,
//! so codes, cache entries and counters follow identical rules.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for missing values)
//! cargo run --bin admin -- link create --owner ops --url https://example.com
//!
//! # Resolve a code (counts as a click)
//! cargo run --bin admin -- link resolve abc123
//!
//! # List an owner's links
//! cargo run --bin admin -- link list --owner ops
//!
//! # Delete a link
//! cargo run --bin admin -- link delete abc123 --owner ops
//!
//! # Click statistics
//! cargo run --bin admin -- link stats abc123 --owner ops
//!
//! # Check database and cache connections
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`shortlink_resolver::config`].

use shortlink_resolver::application::services::LinkService;
use shortlink_resolver::config::{self, Config};
use shortlink_resolver::domain::click_worker::{ClickDispatcher, run_click_worker};
use shortlink_resolver::domain::repositories::LinkRepository;
use shortlink_resolver::infrastructure::cache::RedisCache;
use shortlink_resolver::infrastructure::persistence::PgLinkRepository;
use shortlink_resolver::server::{REDIS_KEY_PREFIX, connect_cache};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// Queue size for clicks produced by `link resolve`.
const CLI_CLICK_QUEUE: usize = 16;

/// CLI tool for managing shortlink-resolver.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// Owner identity
        #[arg(short, long)]
        owner: Option<String>,

        /// Destination URL
        #[arg(short, long)]
        url: Option<String>,

        /// Custom short code (generated if omitted)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Resolve a code to its destination
    Resolve { code: String },

    /// List an owner's links
    List {
        #[arg(short, long)]
        owner: String,

        #[arg(long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 20)]
        page_size: i64,
    },

    /// Delete a link
    Delete {
        code: String,

        #[arg(short, long)]
        owner: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show click statistics for a link
    Stats {
        code: String,

        #[arg(short, long)]
        owner: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database and cache connections
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    Ok(())
}

/// Builds the link service, runs `action`, then flushes any queued clicks.
async fn handle_link_action(action: LinkAction, pool: PgPool, config: &Config) -> Result<()> {
    let cache = connect_cache(config.redis_url.as_deref()).await;
    let repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let (dispatcher, rx) = ClickDispatcher::channel(CLI_CLICK_QUEUE);
    let worker = tokio::spawn(run_click_worker(
        rx,
        repository.clone(),
        cache.clone(),
        config.click_worker_settings(),
    ));

    let service = LinkService::new(repository, cache, dispatcher, config.link_settings());

    let result = match action {
        LinkAction::Create { owner, url, code } => {
            create_link(&service, config, owner, url, code).await
        }
        LinkAction::Resolve { code } => resolve_link(&service, &code).await,
        LinkAction::List {
            owner,
            page,
            page_size,
        } => list_links(&service, config, &owner, page, page_size).await,
        LinkAction::Delete { code, owner, yes } => delete_link(&service, &code, &owner, yes).await,
        LinkAction::Stats { code, owner } => show_stats(&service, &code, &owner).await,
    };

    drop(service);
    let _ = worker.await;

    result
}

/// Creates a link, prompting for anything not given on the command line.
async fn create_link(
    service: &LinkService<dyn LinkRepository>,
    config: &Config,
    owner: Option<String>,
    url: Option<String>,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let owner = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner").interact_text()?,
    };

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let link = service
        .create(&owner, &url, code.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!(
        "  Short URL: {}",
        format!("{}/{}", config.base_url, link.code).cyan()
    );
    println!("  Target:    {}", link.destination.bright_white());
    println!();

    Ok(())
}

async fn resolve_link(service: &LinkService<dyn LinkRepository>, code: &str) -> Result<()> {
    let destination = service
        .resolve(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve '{}': {}", code, e))?;

    println!("{} → {}", code.bright_yellow(), destination.cyan());
    Ok(())
}

/// Lists an owner's links as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links for ops (page 1/1)
///
///   Code       Clicks   Created           Destination
///   ──────────────────────────────────────────────────────────
///   abc123     42       2025-01-15 10:30  https://example.com
/// ```
async fn list_links(
    service: &LinkService<dyn LinkRepository>,
    config: &Config,
    owner: &str,
    page: i64,
    page_size: i64,
) -> Result<()> {
    let page = service
        .list_links(owner, page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    println!(
        "{}",
        format!(
            "📋 Links for {} (page {}/{})",
            owner,
            page.page,
            page.total_pages().max(1)
        )
        .bright_blue()
        .bold()
    );
    println!();

    if page.items.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<17} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &page.items {
        println!(
            "  {:<12} {:<8} {:<17} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.destination
        );
    }

    println!();
    println!(
        "  Total: {}   Base URL: {}",
        page.total.to_string().bright_white().bold(),
        config.base_url.bright_black()
    );
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<dyn LinkRepository>,
    code: &str,
    owner: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(owner, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load '{}': {}", code, e))?;

    println!("  Code:   {}", link.code.cyan());
    println!("  Target: {}", link.destination.bright_white());
    println!("  Clicks: {}", link.clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link permanently?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(owner, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

async fn show_stats(
    service: &LinkService<dyn LinkRepository>,
    code: &str,
    owner: &str,
) -> Result<()> {
    let stats = service
        .stats(owner, code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load stats: {}", e))?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  Code:          {}", stats.code.cyan());
    println!(
        "  Clicks:        {} ({:?})",
        stats.total_clicks.to_string().bright_green().bold(),
        stats.source
    );
    println!(
        "  Last accessed: {}",
        stats
            .last_accessed_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!();

    Ok(())
}

/// Handles connection diagnostics.
async fn handle_db_action(action: DbAction, pool: &PgPool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());

            match config.redis_url.as_deref() {
                Some(redis_url) => {
                    println!("{}", "🔍 Checking cache connection...".bright_blue());
                    match RedisCache::connect(redis_url, REDIS_KEY_PREFIX).await {
                        Ok(_) => println!("{}", "✅ Cache connection OK".green().bold()),
                        Err(e) => println!("{} {}", "⚠️  Cache unreachable:".yellow().bold(), e),
                    }
                }
                None => println!("{}", "ℹ️  Redis not configured".bright_black()),
            }
        }
    }

    Ok(())
}
