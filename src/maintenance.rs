//! Cache-clear orchestration.
//!
//! The original behavior this replaces deleted every local database on
//! clear, taking the user's bookmarks with it even though bookmarks are
//! presented as a deliberately durable feature. Here the routine clear is
//! explicitly scoped: articles and the action queue go, bookmarks stay.
//! `ClearScope::Everything` is the opt-in full wipe.

use crate::remote::NewsClient;
use crate::storage::{CacheStats, Database, StorageError};

/// What an explicit clear should take with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Articles and the offline queue; bookmarks survive
    CacheOnly,
    /// Every collection, bookmarks included
    Everything,
}

/// Clear local caches and return a fresh storage snapshot.
///
/// The auxiliary response cache is notified first, best-effort — it holds
/// nothing durable, so failure to empty it would only cost a refetch.
pub async fn clear_cache(
    db: &Database,
    client: &NewsClient,
    scope: ClearScope,
) -> Result<CacheStats, StorageError> {
    let discarded = client.discard_cached();
    tracing::debug!(discarded, "Auxiliary response cache discarded");

    match scope {
        ClearScope::CacheOnly => {
            let articles = db.purge_articles().await?;
            let actions = db.purge_queue().await?;
            tracing::info!(articles, actions, "Cache cleared, bookmarks kept");
        }
        ClearScope::Everything => {
            db.purge_all().await?;
            tracing::info!("All local collections cleared");
        }
    }

    db.storage_stats().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::DEFAULT_BASE_URL;
    use crate::storage::{Article, Source};
    use chrono::Utc;
    use serde_json::json;

    fn test_article(url: &str) -> Article {
        Article {
            url: url.to_string(),
            title: "Cached".to_string(),
            description: String::new(),
            image_url: None,
            published_at: Utc::now(),
            source: Source {
                name: "Test".to_string(),
            },
        }
    }

    async fn seeded_db() -> Database {
        let db = Database::open(":memory:").await.unwrap();
        db.put_articles(&[test_article("https://example.com/1")])
            .await
            .unwrap();
        db.put_bookmark(&test_article("https://example.com/kept"))
            .await
            .unwrap();
        db.enqueue_action("refresh", &json!({})).await.unwrap();
        db
    }

    fn client() -> NewsClient {
        NewsClient::new(reqwest::Client::new(), DEFAULT_BASE_URL, None)
    }

    #[tokio::test]
    async fn test_cache_only_clear_preserves_bookmarks() {
        let db = seeded_db().await;

        let stats = clear_cache(&db, &client(), ClearScope::CacheOnly)
            .await
            .unwrap();

        assert_eq!(db.article_count().await.unwrap(), 0);
        assert!(db.get_all_actions().await.unwrap().is_empty());
        // Adopted policy: bookmarks survive the routine clear
        assert_eq!(db.get_all_bookmarks().await.unwrap().len(), 1);
        assert!(stats.used_bytes > 0);
    }

    #[tokio::test]
    async fn test_everything_clear_wipes_bookmarks_too() {
        let db = seeded_db().await;

        clear_cache(&db, &client(), ClearScope::Everything)
            .await
            .unwrap();

        assert_eq!(db.article_count().await.unwrap(), 0);
        assert!(db.get_all_bookmarks().await.unwrap().is_empty());
        assert!(db.get_all_actions().await.unwrap().is_empty());
    }
}
