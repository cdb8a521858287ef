//! Sync engine: decides remote-vs-cache sourcing per request and keeps the
//! persistent article cache current.
//!
//! Online loads fetch a page, merge it into the session result list, and
//! persist it; offline loads answer from the cache with local filtering.
//! A failed remote fetch changes nothing: the session list, pagination
//! state, and cache all stay as they were, and the caller decides what to
//! show.

use thiserror::Error;

use crate::connectivity::ConnectivityMonitor;
use crate::remote::{FetchError, NewsClient};
use crate::storage::{Article, Database, StorageError};
use crate::util::matches_query;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote query unreachable or non-success; no state was changed
    #[error("Load failed: {0}")]
    Network(#[from] FetchError),
    /// Offline cache read failed; there is no fallback beneath the store,
    /// so the result list is empty and this error says why
    #[error("Offline cache unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Where a completed load was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
}

// ============================================================================
// Sync Engine
// ============================================================================

/// Orchestrates fetch-vs-cache decisions for paginated article loads.
///
/// Loads take `&mut self`, so a second load cannot begin while one is
/// outstanding — the cooperative serialization the caller would otherwise
/// have to provide with a loading flag. Cache writes are idempotent upserts,
/// so a load whose result the caller discards still leaves the cache valid.
pub struct SyncEngine {
    client: NewsClient,
    db: Database,
    connectivity: ConnectivityMonitor,
    page_size: u32,
    articles: Vec<Article>,
    has_more: bool,
}

impl SyncEngine {
    pub fn new(
        client: NewsClient,
        db: Database,
        connectivity: ConnectivityMonitor,
        page_size: u32,
    ) -> Self {
        Self {
            client,
            db,
            connectivity,
            page_size,
            articles: Vec::new(),
            has_more: true,
        }
    }

    /// Load one page of results for `query`.
    ///
    /// Online: fetches `page` at the engine's fixed page size, replaces the
    /// session list if `refresh` (otherwise appends, preserving prior order),
    /// sets `has_more` from page emptiness, and persists the fetched
    /// articles. A persist failure is logged and swallowed — the fetched data
    /// stays usable in memory for this session.
    ///
    /// Offline: reads the whole cache and filters it locally with the
    /// case-insensitive substring rule; `page` is ignored and `has_more`
    /// becomes false. A store failure empties the result list and surfaces
    /// as [`SyncError::Storage`].
    ///
    /// On a remote failure nothing changes — not the session list, not
    /// `has_more` — so a transient error cannot end an infinite scroll.
    pub async fn load_page(
        &mut self,
        page: u32,
        query: &str,
        refresh: bool,
    ) -> Result<LoadSource, SyncError> {
        if self.connectivity.is_online() {
            self.load_remote(page, query, refresh).await
        } else {
            self.load_cached(query).await
        }
    }

    async fn load_remote(
        &mut self,
        page: u32,
        query: &str,
        refresh: bool,
    ) -> Result<LoadSource, SyncError> {
        let response = match self.client.fetch_headlines(page, self.page_size, query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(page, query, error = %e, "Remote load failed, keeping previous results");
                return Err(SyncError::Network(e));
            }
        };

        let fetched = response.articles;
        self.has_more = !fetched.is_empty();
        if refresh {
            self.articles.clear();
        }
        self.articles.extend(fetched.iter().cloned());

        // The cache write completes before the load is reported done, so a
        // read immediately after observes the new data. Failure here is
        // non-fatal: the session keeps its in-memory results.
        match self.db.put_articles(&fetched).await {
            Ok(written) => tracing::debug!(page, written, "Persisted fetched page"),
            Err(e) => {
                tracing::warn!(error = %e, "Could not persist fetched articles; session continues in memory")
            }
        }

        Ok(LoadSource::Remote)
    }

    async fn load_cached(&mut self, query: &str) -> Result<LoadSource, SyncError> {
        let cached = match self.db.get_all_articles().await {
            Ok(cached) => cached,
            Err(e) => {
                // Offline mode has nothing beneath the store: empty result
                // set, distinguishable error.
                self.articles.clear();
                self.has_more = false;
                tracing::error!(error = %e, "Offline cache read failed");
                return Err(SyncError::Storage(e));
            }
        };

        let total = cached.len();
        self.articles = cached
            .into_iter()
            .filter(|a| matches_query(a, query))
            .collect();
        self.has_more = false;

        tracing::debug!(
            query,
            matched = self.articles.len(),
            cached = total,
            "Served load from cache"
        );
        Ok(LoadSource::Cache)
    }

    /// The accumulated session result list.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Whether the remote source may have further pages for the current
    /// query. Always false after an offline load.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// The fixed page size used for remote queries.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
