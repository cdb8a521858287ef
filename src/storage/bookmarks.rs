use chrono::Utc;

use super::schema::Database;
use super::types::{Article, ArticleRow, StorageError};

impl Database {
    // ========================================================================
    // Bookmark Operations
    // ========================================================================

    /// Insert (or overwrite) a bookmark, keyed by the article url.
    pub async fn put_bookmark(&self, article: &Article) -> Result<(), StorageError> {
        let now = Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO bookmarks
                (url, title, description, image_url, published_at, source_name, saved_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                image_url = excluded.image_url,
                published_at = excluded.published_at,
                source_name = excluded.source_name
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

        Ok(())
    }

    /// Remove a bookmark by url, returning whether anything was deleted.
    pub async fn delete_bookmark(&self, url: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE url = ?")
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    /// Return every bookmarked article, most recently saved first.
    pub async fn get_all_bookmarks(&self) -> Result<Vec<Article>, StorageError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            r#"
            SELECT url, title, description, image_url, published_at, source_name
            FROM bookmarks
            ORDER BY saved_at DESC
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(rows.into_iter().map(ArticleRow::into_article).collect())
    }

    /// Delete every bookmark. Used by the explicit full wipe only; the
    /// routine cache clear leaves this collection alone.
    pub async fn purge_bookmarks(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM bookmarks")
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(result.rows_affected())
    }
}
