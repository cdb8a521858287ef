//! Bookmark manager: the user's curated, always-available article subset.
//!
//! Bookmarks live in their own store collection, disjoint from the general
//! article cache, and outlive both connectivity loss and the routine cache
//! clear. The manager keeps an in-memory mirror of the collection so that
//! `is_bookmarked` answers without I/O; the mirror is rebuilt from the store
//! at startup and after every mutation, so there is no window where a
//! completed toggle is not yet observable.

use chrono::Utc;
use std::collections::HashMap;

use crate::storage::{Article, Database, Source, StorageError};

pub struct BookmarkManager {
    db: Database,
    mirror: HashMap<String, Article>,
}

impl BookmarkManager {
    /// Build a manager with its mirror loaded from the store.
    pub async fn load(db: Database) -> Result<Self, StorageError> {
        let mut manager = Self {
            db,
            mirror: HashMap::new(),
        };
        manager.refresh_mirror().await?;
        Ok(manager)
    }

    async fn refresh_mirror(&mut self) -> Result<(), StorageError> {
        let stored = self.db.get_all_bookmarks().await?;
        self.mirror = stored.into_iter().map(|a| (a.url.clone(), a)).collect();
        Ok(())
    }

    /// Toggle an article's bookmark state, returning whether it is now
    /// bookmarked. The mirror reflects the change before this returns.
    pub async fn toggle(&mut self, article: &Article) -> Result<bool, StorageError> {
        if self.mirror.contains_key(&article.url) {
            self.db.delete_bookmark(&article.url).await?;
            tracing::info!(url = %article.url, "Bookmark removed");
        } else {
            self.db.put_bookmark(article).await?;
            tracing::info!(url = %article.url, "Bookmark added");
        }
        self.refresh_mirror().await?;
        Ok(self.mirror.contains_key(&article.url))
    }

    /// Toggle by url alone. Bookmarking does not require the article to be
    /// in the cache: an existing bookmark or cached record supplies the
    /// metadata, otherwise a minimal record is built from `title` (or the
    /// url itself).
    pub async fn toggle_url(
        &mut self,
        url: &str,
        title: Option<&str>,
    ) -> Result<bool, StorageError> {
        if let Some(existing) = self.mirror.get(url).cloned() {
            return self.toggle(&existing).await;
        }

        let article = match self.db.get_article(url).await? {
            Some(cached) => cached,
            None => Article {
                url: url.to_string(),
                title: title.unwrap_or(url).to_string(),
                description: String::new(),
                image_url: None,
                published_at: Utc::now(),
                source: Source {
                    name: String::new(),
                },
            },
        };
        self.toggle(&article).await
    }

    /// Pure lookup against the in-memory mirror; never touches the store.
    pub fn is_bookmarked(&self, url: &str) -> bool {
        self.mirror.contains_key(url)
    }

    /// Current bookmarks, most recently saved first.
    pub async fn bookmarks(&self) -> Result<Vec<Article>, StorageError> {
        // The store keeps saved_at ordering; the mirror is an unordered map
        self.db.get_all_bookmarks().await
    }

    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    /// Wipe the bookmark collection and mirror.
    pub async fn clear_all(&mut self) -> Result<(), StorageError> {
        self.db.purge_bookmarks().await?;
        self.mirror.clear();
        Ok(())
    }
}
