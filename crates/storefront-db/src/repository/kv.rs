//! # Key-Value Repository
//!
//! Durable local storage: one text document per key in `kv_store`.
//!
//! Writes are upserts; the latest write for a key wins.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// A stored row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for raw key-value documents.
///
/// ## Usage
/// ```rust,ignore
/// let kv = db.kv();
/// kv.put("cart", r#"{"version":1,...}"#).await?;
/// let raw = kv.get("cart").await?;
/// ```
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Returns the document stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Returns the full row stored under `key`.
    pub async fn get_entry(&self, key: &str) -> DbResult<Option<KvEntry>> {
        let entry = sqlx::query_as::<_, KvEntry>(
            "SELECT key, value, updated_at FROM kv_store WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Stores `value` under `key`, replacing any previous document.
    pub async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing key-value document");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes the document under `key`. Returns whether one existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, deleted = result.rows_affected(), "Deleted key-value document");
        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }

    /// Decodes the JSON document under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it under `key`.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};
    use serde::Deserialize;

    async fn repo() -> KvRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().kv()
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let kv = repo().await;
        assert_eq!(kv.get("cart").await.unwrap(), None);

        kv.put("cart", "first").await.unwrap();
        kv.put("cart", "second").await.unwrap();
        assert_eq!(kv.get("cart").await.unwrap().as_deref(), Some("second"));

        let entry = kv.get_entry("cart").await.unwrap().unwrap();
        assert_eq!(entry.key, "cart");
        assert_eq!(entry.value, "second");
        assert!(entry.updated_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_delete_and_keys() {
        let kv = repo().await;
        kv.put("wishlist", "[]").await.unwrap();
        kv.put("cart", "{}").await.unwrap();
        assert_eq!(kv.keys().await.unwrap(), vec!["cart", "wishlist"]);

        assert!(kv.delete("cart").await.unwrap());
        assert!(!kv.delete("cart").await.unwrap());
        assert_eq!(kv.keys().await.unwrap(), vec!["wishlist"]);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        currency: String,
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let kv = repo().await;
        let prefs = Prefs {
            currency: "USD".to_string(),
        };
        kv.put_json("prefs", &prefs).await.unwrap();
        assert_eq!(kv.get_json::<Prefs>("prefs").await.unwrap(), Some(prefs));
        assert_eq!(kv.get_json::<Prefs>("missing").await.unwrap(), None);

        kv.put("prefs", "not json").await.unwrap();
        let err = kv.get_json::<Prefs>("prefs").await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }
}
