use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::StorageError;

/// Current schema version, recorded in `PRAGMA user_version`.
///
/// Any structural change requires bumping this and extending `migrate` with
/// an upgrade step that creates the missing collections without destroying
/// existing ones.
const SCHEMA_VERSION: i64 = 1;

// ============================================================================
// Database
// ============================================================================

/// Durable keyed collections shared by the sync engine and bookmark manager.
///
/// The two components never write the same collection, so the pool can be
/// shared without transactional isolation between them.
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when the file cannot be opened or
    /// another process holds the lock, `StorageError::Migration` when the
    /// on-disk schema is newer than this build understands.
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // busy_timeout=5000: wait up to 5s for locks before SQLITE_BUSY.
        // pragma() ensures every pooled connection inherits the setting.
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(StorageError::from_sqlx)?
            .pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(StorageError::from_sqlx)?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run schema migrations atomically within a transaction.
    ///
    /// Every step uses `IF NOT EXISTS`, so re-running on an existing database
    /// only creates whatever collections are missing; existing data is never
    /// touched. If any step fails the transaction rolls back and the database
    /// stays at its previous consistent state.
    async fn migrate(&self) -> Result<(), StorageError> {
        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        if version > SCHEMA_VERSION {
            return Err(StorageError::Migration(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::from_sqlx)?;

        // Article cache collection, keyed by url (last-write-wins upserts)
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image_url TEXT,
                published_at TEXT NOT NULL,
                source_name TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from_sqlx)?;

        // Bookmark collection: disjoint from the article cache so a cache
        // clear cannot take bookmarks with it
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image_url TEXT,
                published_at TEXT NOT NULL,
                source_name TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from_sqlx)?;

        // Offline action queue. AUTOINCREMENT keeps ids monotonic and never
        // reused, even across clears.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS offline_queue (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from_sqlx)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_articles_fetched ON articles(fetched_at DESC)")
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from_sqlx)?;

        if version < SCHEMA_VERSION {
            // PRAGMA does not support bind parameters; SCHEMA_VERSION is a
            // trusted compile-time constant.
            sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from_sqlx)?;
        }

        tx.commit().await.map_err(StorageError::from_sqlx)?;

        tracing::debug!(version = SCHEMA_VERSION, "Schema migrations complete");
        Ok(())
    }

    /// Destroy every collection: articles, bookmarks, and the action queue.
    ///
    /// Only for an explicit, user-initiated full wipe. The routine cache
    /// clear (`maintenance::clear_cache` with `ClearScope::CacheOnly`)
    /// deliberately leaves bookmarks in place.
    pub async fn purge_all(&self) -> Result<(), StorageError> {
        self.purge_articles().await?;
        self.purge_bookmarks().await?;
        self.purge_queue().await?;
        Ok(())
    }
}
