use chrono::Utc;

use super::schema::Database;
use super::types::{PendingAction, StorageError};

impl Database {
    // ========================================================================
    // Offline Action Queue
    // ========================================================================

    /// Append an action to the queue, returning its store-assigned id.
    ///
    /// Ids come from the AUTOINCREMENT rowid: monotonically increasing and
    /// never reused, even after the queue has been cleared.
    pub async fn enqueue_action(
        &self,
        kind: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, StorageError> {
        let now = Utc::now().timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO offline_queue (kind, payload, created_at)
            VALUES (?, ?, ?)
        "#,
        )
        .bind(kind)
        .bind(payload.to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(result.last_insert_rowid())
    }

    /// Return all pending actions in insertion (intended replay) order.
    pub async fn get_all_actions(&self) -> Result<Vec<PendingAction>, StorageError> {
        let rows: Vec<(i64, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT id, kind, payload, created_at
            FROM offline_queue
            ORDER BY id ASC
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(id, kind, payload, created_at)| PendingAction {
                id,
                kind,
                // A payload that no longer parses is kept visible as null
                // rather than dropping the whole action.
                payload: serde_json::from_str(&payload).unwrap_or_else(|e| {
                    tracing::warn!(id, error = %e, "Queued action payload is not valid JSON, surfacing as null");
                    serde_json::Value::Null
                }),
                created_at,
            })
            .collect())
    }

    /// Remove every queued action (after successful replay or explicit clear).
    pub async fn clear_actions(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM offline_queue")
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;
        Ok(result.rows_affected())
    }

    /// Alias used by the composite purge; the queue has no separate state.
    pub async fn purge_queue(&self) -> Result<u64, StorageError> {
        self.clear_actions().await
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;
    use serde_json::json;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_preserves_insertion_order() {
        let db = test_db().await;
        db.enqueue_action("refresh", &json!({"page": 1})).await.unwrap();
        db.enqueue_action("refresh", &json!({"page": 2})).await.unwrap();
        db.enqueue_action("bookmark", &json!({"url": "https://example.com/1"}))
            .await
            .unwrap();

        let actions = db.get_all_actions().await.unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].payload["page"], 1);
        assert_eq!(actions[1].payload["page"], 2);
        assert_eq!(actions[2].kind, "bookmark");
    }

    #[tokio::test]
    async fn test_ids_monotonic_and_never_reused() {
        let db = test_db().await;
        let first = db.enqueue_action("a", &json!({})).await.unwrap();
        let second = db.enqueue_action("b", &json!({})).await.unwrap();
        assert!(second > first);

        db.clear_actions().await.unwrap();

        // A fresh insert after a clear must not reuse an old id
        let third = db.enqueue_action("c", &json!({})).await.unwrap();
        assert!(third > second);
    }

    #[tokio::test]
    async fn test_clear_actions() {
        let db = test_db().await;
        db.enqueue_action("a", &json!({})).await.unwrap();
        db.enqueue_action("b", &json!({})).await.unwrap();

        let cleared = db.clear_actions().await.unwrap();
        assert_eq!(cleared, 2);
        assert!(db.get_all_actions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_payload_surfaces_as_null() {
        let db = test_db().await;
        db.enqueue_action("refresh", &json!({"page": 1})).await.unwrap();

        // Simulate on-disk corruption of one row's payload
        sqlx::query("INSERT INTO offline_queue (kind, payload, created_at) VALUES (?, ?, ?)")
            .bind("bookmark")
            .bind("{not json")
            .bind(1_700_000_000_i64)
            .execute(&db.pool)
            .await
            .unwrap();

        let actions = db.get_all_actions().await.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].payload, json!({"page": 1}));
        // The corrupt action stays visible with a null payload
        assert_eq!(actions[1].kind, "bookmark");
        assert_eq!(actions[1].payload, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_payload_round_trip() {
        let db = test_db().await;
        let payload = json!({"url": "https://example.com/9", "nested": {"flag": true}});
        db.enqueue_action("bookmark", &payload).await.unwrap();

        let actions = db.get_all_actions().await.unwrap();
        assert_eq!(actions[0].payload, payload);
        assert!(actions[0].created_at > 0);
    }
}
