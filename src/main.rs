use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;

use newsstand::bookmarks::BookmarkManager;
use newsstand::config::Config;
use newsstand::connectivity::{self, ConnectivityMonitor};
use newsstand::maintenance::{self, ClearScope};
use newsstand::remote::NewsClient;
use newsstand::storage::Database;
use newsstand::sync::SyncEngine;
use newsstand::util::format_size;

/// Get the config directory path (~/.config/newsstand/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsstand"))
}

#[derive(Parser, Debug)]
#[command(name = "newsstand", about = "Offline-capable news reader")]
struct Args {
    /// Force offline mode (serve everything from the local cache)
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a page of headlines (or read the cache when offline)
    Fetch {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Search query (empty = top headlines)
        #[arg(long, default_value = "")]
        query: String,

        /// Replace the session list instead of appending
        #[arg(long)]
        refresh: bool,
    },

    /// Search headlines for a term
    Search { query: String },

    /// Manage bookmarked articles
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Inspect or edit the offline action queue
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },

    /// Show local storage usage
    Stats,

    /// Clear the article cache and action queue
    Clear {
        /// Also delete bookmarks
        #[arg(long)]
        everything: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BookmarkAction {
    /// List bookmarked articles, most recently saved first
    List,
    /// Toggle the bookmark for an article by URL (cached or not)
    Toggle {
        url: String,

        /// Title to record when the article is not in the cache
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete all bookmarks
    Clear,
}

#[derive(Subcommand, Debug)]
enum QueueAction {
    /// List pending actions in insertion order
    List,
    /// Record an action to replay once back online
    Add {
        kind: String,
        /// JSON payload for the action
        #[arg(default_value = "{}")]
        payload: String,
    },
    /// Drop all pending actions
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let config = Config::load(&config_dir.join("config.toml"))?;

    // Env var wins over the config file; neither means fixture mode
    let api_key = std::env::var("NEWSSTAND_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| config.api_key.clone())
        .map(SecretString::from);

    let db_path = config_dir.join(&config.database);
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = Database::open(db_path_str)
        .await
        .context("Failed to open local database")?;

    let http = reqwest::Client::new();
    let client = NewsClient::new(http.clone(), config.base_url.clone(), api_key);

    // Connectivity: forced flag beats everything; fixture mode needs no
    // network so it always counts as online; otherwise probe the endpoint.
    let online = if args.offline {
        false
    } else if !client.has_credentials() {
        true
    } else {
        connectivity::probe(&http, &config.base_url).await
    };
    let monitor = ConnectivityMonitor::new(online);
    tracing::info!(online, "Starting up");

    match args.command {
        Command::Fetch {
            page,
            query,
            refresh,
        } => {
            let mut engine = SyncEngine::new(client, db, monitor, config.effective_page_size());
            run_fetch(&mut engine, page, &query, refresh).await?;
        }
        Command::Search { query } => {
            let mut engine = SyncEngine::new(client, db, monitor, config.effective_page_size());
            run_fetch(&mut engine, 1, &query, true).await?;
        }
        Command::Bookmarks { action } => {
            run_bookmarks(db, action).await?;
        }
        Command::Queue { action } => {
            run_queue(db, action).await?;
        }
        Command::Stats => {
            let stats = db.storage_stats().await?;
            let cached = db.article_count().await?;
            let bookmarks = db.get_all_bookmarks().await?.len();
            let queued = db.get_all_actions().await?.len();
            println!("Cached articles: {}", cached);
            println!("Bookmarks:       {}", bookmarks);
            println!("Queued actions:  {}", queued);
            println!("Storage used:    {}", format_size(stats.used_bytes));
            match stats.total_bytes {
                Some(total) => println!("Storage limit:   {}", format_size(total)),
                None => println!("Storage limit:   unlimited"),
            }
        }
        Command::Clear { everything } => {
            let scope = if everything {
                ClearScope::Everything
            } else {
                ClearScope::CacheOnly
            };
            let stats = maintenance::clear_cache(&db, &client, scope).await?;
            println!("Cache cleared ({} in use)", format_size(stats.used_bytes));
            if !everything {
                println!("Bookmarks were kept; use --everything to remove them too.");
            }
        }
    }

    Ok(())
}

async fn run_fetch(engine: &mut SyncEngine, page: u32, query: &str, refresh: bool) -> Result<()> {
    let source = engine
        .load_page(page, query, refresh)
        .await
        .context("Load failed")?;

    println!(
        "{} articles ({:?}{})",
        engine.articles().len(),
        source,
        if engine.has_more() { ", more available" } else { "" }
    );
    for article in engine.articles() {
        println!("  [{}] {}", article.source.name, article.title);
        println!("      {}", article.url);
    }
    Ok(())
}

async fn run_bookmarks(db: Database, action: BookmarkAction) -> Result<()> {
    let mut manager = BookmarkManager::load(db)
        .await
        .context("Failed to load bookmarks")?;

    match action {
        BookmarkAction::List => {
            let bookmarks = manager.bookmarks().await?;
            if bookmarks.is_empty() {
                println!("No bookmarks.");
            }
            for article in bookmarks {
                println!("  [{}] {}", article.source.name, article.title);
                println!("      {}", article.url);
            }
        }
        BookmarkAction::Toggle { url, title } => {
            let bookmarked = manager.toggle_url(&url, title.as_deref()).await?;
            if bookmarked {
                println!("Bookmarked: {}", url);
            } else {
                println!("Bookmark removed: {}", url);
            }
        }
        BookmarkAction::Clear => {
            manager.clear_all().await?;
            println!("All bookmarks removed.");
        }
    }
    Ok(())
}

async fn run_queue(db: Database, action: QueueAction) -> Result<()> {
    match action {
        QueueAction::List => {
            let actions = db.get_all_actions().await?;
            if actions.is_empty() {
                println!("Queue is empty.");
            }
            for pending in actions {
                println!(
                    "  #{} {} ({}) {}",
                    pending.id, pending.kind, pending.created_at, pending.payload
                );
            }
        }
        QueueAction::Add { kind, payload } => {
            let payload: serde_json::Value =
                serde_json::from_str(&payload).context("Payload must be valid JSON")?;
            let id = db.enqueue_action(&kind, &payload).await?;
            println!("Queued action #{}", id);
        }
        QueueAction::Clear => {
            db.clear_actions().await?;
            println!("Queue cleared.");
        }
    }
    Ok(())
}
