use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Persistent-store errors with a coarse classification callers can act on.
///
/// `Unavailable` and `QuotaExceeded` are non-fatal for cache writes: the
/// session keeps its in-memory results and simply loses durability. Offline
/// cache reads have no fallback beneath the store, so there they surface to
/// the caller as an empty result set with this error attached.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store cannot be opened or written (locked, missing, disabled)
    #[error("Persistent storage unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected for space
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Schema migration failed or the on-disk version is unsupported
    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Storage error: {0}")]
    Other(#[from] sqlx::Error),
}

impl StorageError {
    /// Classify a sqlx error into the store's failure taxonomy.
    ///
    /// SQLITE_FULL (13) reports as "database or disk is full".
    /// SQLITE_BUSY (5), SQLITE_LOCKED (6), and SQLITE_CANTOPEN (14) all mean
    /// the store is unreachable for this session.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let message = err.to_string();
        let lowered = message.to_lowercase();

        if lowered.contains("database or disk is full") || lowered.contains("sqlite_full") {
            return StorageError::QuotaExceeded(message);
        }
        if lowered.contains("database is locked")
            || lowered.contains("database table is locked")
            || lowered.contains("sqlite_busy")
            || lowered.contains("sqlite_locked")
            || lowered.contains("unable to open database file")
        {
            return StorageError::Unavailable(message);
        }

        StorageError::Other(err)
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
}

/// A news article as fetched from the remote source.
///
/// Identity is the `url`; a later fetch of the same url overwrites the
/// earlier record (last-write-wins, no versioning). Wire field names follow
/// the NewsAPI shape, hence the `urlToImage` rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: Source,
}

/// A pending mutation recorded while offline, left for future replay tooling.
///
/// `id` is assigned by the store, monotonically increasing and never reused;
/// insertion order is the intended replay order.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub id: i64,
    pub kind: String,
    pub payload: serde_json::Value,
    pub created_at: i64,
}

/// Advisory storage usage snapshot, recomputed on demand.
///
/// `total_bytes` is `None` when the platform reports no quota — absence
/// means "unknown", never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub used_bytes: u64,
    pub total_bytes: Option<u64>,
}

// ============================================================================
// Helper Types
// ============================================================================

/// Internal row type for article queries (used by sqlx FromRow).
/// The flat `source_name` column folds back into the nested `Source`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ArticleRow {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source_name: String,
}

impl ArticleRow {
    pub(crate) fn into_article(self) -> Article {
        Article {
            url: self.url,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            published_at: self.published_at,
            source: Source {
                name: self.source_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_wire_format_round_trip() {
        let json = r#"{
            "url": "https://example.com/1",
            "title": "Advanced Client-Side Caching Techniques",
            "description": "Learn how to build high-performance PWAs.",
            "urlToImage": "https://images.example.com/photo.jpg",
            "publishedAt": "2025-01-15T12:00:00Z",
            "source": { "name": "Tech News" }
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.url, "https://example.com/1");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://images.example.com/photo.jpg")
        );
        assert_eq!(article.source.name, "Tech News");

        let serialized = serde_json::to_value(&article).unwrap();
        assert!(serialized.get("urlToImage").is_some());
        assert!(serialized.get("publishedAt").is_some());
        assert!(serialized.get("image_url").is_none());
    }

    #[test]
    fn test_article_missing_description_defaults_empty() {
        let json = r#"{
            "url": "https://example.com/2",
            "title": "No Description",
            "urlToImage": null,
            "publishedAt": "2025-01-15T12:00:00Z",
            "source": { "name": "Wire" }
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.description, "");
        assert!(article.image_url.is_none());
    }
}
