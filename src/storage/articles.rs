use chrono::Utc;

use super::schema::Database;
use super::types::{Article, ArticleRow, StorageError};

impl Database {
    // ========================================================================
    // Article Cache Operations
    // ========================================================================

    /// Upsert articles into the cache by url, returning the number written.
    ///
    /// Each put is atomic per key; all-or-nothing across the batch is not
    /// required, so a failure partway leaves the earlier rows in place.
    /// A later fetch of the same url overwrites the earlier record
    /// (last-write-wins, no versioning).
    pub async fn put_articles(&self, articles: &[Article]) -> Result<usize, StorageError> {
        let now = Utc::now().timestamp();
        let mut written = 0;

        for article in articles {
            sqlx::query(
                r#"
                INSERT INTO articles
                    (url, title, description, image_url, published_at, source_name, fetched_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    image_url = excluded.image_url,
                    published_at = excluded.published_at,
                    source_name = excluded.source_name,
                    fetched_at = excluded.fetched_at
            "#,
            )
            .bind(&article.url)
            .bind(&article.title)
            .bind(&article.description)
            .bind(&article.image_url)
            .bind(article.published_at)
            .bind(&article.source.name)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

            written += 1;
        }

        Ok(written)
    }

    /// Return every cached article. No ordering is guaranteed by contract;
    /// callers must not assume insertion order.
    pub async fn get_all_articles(&self) -> Result<Vec<Article>, StorageError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT url, title, description, image_url, published_at, source_name
            FROM articles
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    /// Look up a single cached article by its url.
    pub async fn get_article(&self, url: &str) -> Result<Option<Article>, StorageError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT url, title, description, image_url, published_at, source_name
            FROM articles
            WHERE url = ?
        "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(row.map(ArticleRow::into_article))
    }

    /// Number of entries in the article cache.
    pub async fn article_count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(count)
    }

    /// Delete every entry in the article cache. Bookmarks and the action
    /// queue are untouched.
    pub async fn purge_articles(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM articles")
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(result.rows_affected())
    }
}
