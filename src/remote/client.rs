use lru::LruCache;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use super::fixtures;
use crate::storage::Article;
use crate::util::matches_query;

/// Default page size for remote queries.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Default remote endpoint (NewsAPI-compatible).
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Artificial latency for the keyless fixture path.
const FIXTURE_LATENCY: Duration = Duration::from_millis(500);

/// Capacity of the auxiliary response cache (recent query pages).
const RESPONSE_CACHE_SIZE: usize = 32;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the remote query interface.
///
/// All of these surface at the sync-engine boundary as a failed load with no
/// state change; none of them is fatal to the session.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body was not a valid headline listing
    #[error("Malformed response: {0}")]
    Decode(String),
}

// ============================================================================
// Wire Types
// ============================================================================

/// A page of headlines as returned by the remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: u32,
    pub articles: Vec<Article>,
}

#[derive(Debug, Hash, PartialEq, Eq)]
struct QueryKey {
    page: u32,
    page_size: u32,
    query: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the paginated remote article source.
///
/// Keeps a small LRU of recent responses — the network-level cache layer
/// sitting beside the persistent article cache. A cache clear discards it
/// via [`NewsClient::discard_cached`]; losing it only costs a refetch.
///
/// When no API key is configured the client serves a fixed three-article
/// fixture set behind an artificial delay, filtered by the same substring
/// rule as offline mode.
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    responses: Mutex<LruCache<QueryKey, NewsResponse>>,
}

impl NewsClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<SecretString>) -> Self {
        let capacity = NonZeroUsize::new(RESPONSE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            http,
            base_url: base_url.into(),
            api_key,
            responses: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Whether a real credential is configured (fixture mode otherwise).
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch one page of headlines for `query` (empty query = top headlines).
    ///
    /// A repeated identical request within the session is answered from the
    /// response cache without touching the network.
    pub async fn fetch_headlines(
        &self,
        page: u32,
        page_size: u32,
        query: &str,
    ) -> Result<NewsResponse, FetchError> {
        let Some(api_key) = &self.api_key else {
            return self.fixture_headlines(query).await;
        };

        let key = QueryKey {
            page,
            page_size,
            query: query.to_string(),
        };
        {
            let mut cache = self.responses.lock().unwrap_or_else(|p| p.into_inner());
            if let Some(hit) = cache.get(&key) {
                tracing::debug!(page, query, "Serving headlines from response cache");
                return Ok(hit.clone());
            }
        }

        // Queried searches go to the everything endpoint, blank queries to
        // the country-scoped top headlines, matching the upstream API shape.
        let endpoint = if query.is_empty() {
            format!("{}/top-headlines", self.base_url)
        } else {
            format!("{}/everything", self.base_url)
        };

        let mut request = self.http.get(&endpoint).query(&[
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
            ("apiKey", api_key.expose_secret().to_string()),
        ]);
        if query.is_empty() {
            request = request.query(&[("country", "us")]);
        } else {
            request = request.query(&[("q", query)]);
        }

        let response = tokio::time::timeout(FETCH_TIMEOUT, request.send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!(
            page,
            query,
            returned = body.articles.len(),
            total = body.total_results,
            "Fetched headlines"
        );

        let mut cache = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        cache.put(key, body.clone());
        Ok(body)
    }

    /// Discard the auxiliary response cache, returning how many entries were
    /// dropped. Called (best-effort) by the cache-clear path.
    pub fn discard_cached(&self) -> usize {
        let mut cache = self.responses.lock().unwrap_or_else(|p| p.into_inner());
        let dropped = cache.len();
        cache.clear();
        dropped
    }

    /// Keyless stand-in: the fixed fixture set, filtered like offline mode,
    /// after a simulated network delay. Pagination is ignored here.
    async fn fixture_headlines(&self, query: &str) -> Result<NewsResponse, FetchError> {
        tracing::warn!("No API key configured, serving fixture headlines");
        tokio::time::sleep(FIXTURE_LATENCY).await;

        let articles: Vec<Article> = fixtures::sample_headlines()
            .into_iter()
            .filter(|a| matches_query(a, query))
            .collect();

        Ok(NewsResponse {
            status: "ok".to_string(),
            total_results: articles.len() as u32,
            articles,
        })
    }
}

/// Mask the API key in debug output.
impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
