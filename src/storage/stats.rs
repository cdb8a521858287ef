use super::schema::Database;
use super::types::{CacheStats, StorageError};

/// SQLite reports its compile-time page ceiling when no explicit
/// `max_page_count` has been configured. At or above this there is no real
/// quota, so the total is reported as unknown rather than a fictional limit.
const UNLIMITED_PAGE_COUNT: i64 = 1_073_741_823;

impl Database {
    // ========================================================================
    // Storage Statistics
    // ========================================================================

    /// Compute an advisory usage snapshot from the storage subsystem.
    ///
    /// Purely informational, recomputed on demand (callers re-query after a
    /// load or a clear). `total_bytes` is `None` when the platform has no
    /// configured quota — unknown, not zero.
    pub async fn storage_stats(&self) -> Result<CacheStats, StorageError> {
        let (page_count,): (i64,) = sqlx::query_as("PRAGMA page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        let (page_size,): (i64,) = sqlx::query_as("PRAGMA page_size")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        let (max_page_count,): (i64,) = sqlx::query_as("PRAGMA max_page_count")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        let used_bytes = page_count.saturating_mul(page_size).max(0) as u64;
        let total_bytes = if max_page_count >= UNLIMITED_PAGE_COUNT {
            None
        } else {
            Some(max_page_count.saturating_mul(page_size).max(0) as u64)
        };

        Ok(CacheStats {
            used_bytes,
            total_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::{Article, Database, Source};
    use chrono::Utc;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_used_bytes_nonzero_after_migration() {
        let db = test_db().await;
        let stats = db.storage_stats().await.unwrap();
        // The migrated schema itself occupies at least one page
        assert!(stats.used_bytes > 0);
    }

    #[tokio::test]
    async fn test_total_unknown_without_quota() {
        let db = test_db().await;
        let stats = db.storage_stats().await.unwrap();
        assert_eq!(stats.total_bytes, None);
    }

    #[tokio::test]
    async fn test_usage_grows_with_data() {
        let db = test_db().await;
        let before = db.storage_stats().await.unwrap();

        let articles: Vec<Article> = (0..200)
            .map(|i| Article {
                url: format!("https://example.com/{}", i),
                title: format!("Article {}", i),
                description: "x".repeat(512),
                image_url: None,
                published_at: Utc::now(),
                source: Source {
                    name: "Bulk".to_string(),
                },
            })
            .collect();
        db.put_articles(&articles).await.unwrap();

        let after = db.storage_stats().await.unwrap();
        assert!(after.used_bytes >= before.used_bytes);
    }
}
