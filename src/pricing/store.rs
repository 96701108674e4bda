//! Record store for archived calculations.
//!
//! The pricing engines never touch storage; callers archive the value an
//! engine produced, unchanged. Documents are opaque JSON here so that listing
//! can upgrade older shapes before validating them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::queries;

/// Collection holding one market's calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    International,
    Uk,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::International => "calculations",
            Collection::Uk => "uk_calculations",
        }
    }
}

/// All errors that can be returned by a RecordStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record {id} already exists in {collection}")]
    Duplicate { collection: &'static str, id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence for calculation documents, keyed by id within a collection.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Store a document, returning its id.
    async fn archive(
        &self,
        collection: Collection,
        id: &str,
        recorded_at: DateTime<Utc>,
        document: Value,
    ) -> Result<String, StoreError>;

    /// Up to `limit` documents, most recent first.
    async fn list_recent(&self, collection: Collection, limit: i64)
        -> Result<Vec<Value>, StoreError>;

    /// Delete documents by id, returning how many were removed.
    async fn delete_by_ids(&self, collection: Collection, ids: &[String])
        -> Result<u64, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Wrap a pool, creating the record table if needed
    pub async fn connect(pool: PgPool) -> Result<Self, StoreError> {
        queries::ensure_schema(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn archive(
        &self,
        collection: Collection,
        id: &str,
        recorded_at: DateTime<Utc>,
        document: Value,
    ) -> Result<String, StoreError> {
        queries::insert_record(&self.pool, collection.as_str(), id, recorded_at, &document)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return StoreError::Duplicate {
                            collection: collection.as_str(),
                            id: id.to_string(),
                        };
                    }
                }
                StoreError::Database(e)
            })?;

        Ok(id.to_string())
    }

    async fn list_recent(
        &self,
        collection: Collection,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        Ok(queries::get_recent_records(&self.pool, collection.as_str(), limit).await?)
    }

    async fn delete_by_ids(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<u64, StoreError> {
        Ok(queries::delete_records(&self.pool, collection.as_str(), ids).await?)
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    collection: Collection,
    id: String,
    recorded_at: DateTime<Utc>,
    document: Value,
}

/// In-process store for development without a database, and for tests
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn archive(
        &self,
        collection: Collection,
        id: &str,
        recorded_at: DateTime<Utc>,
        document: Value,
    ) -> Result<String, StoreError> {
        let mut records = self.records.write().await;

        if records
            .iter()
            .any(|r| r.collection == collection && r.id == id)
        {
            return Err(StoreError::Duplicate {
                collection: collection.as_str(),
                id: id.to_string(),
            });
        }

        records.push(StoredRecord {
            collection,
            id: id.to_string(),
            recorded_at,
            document,
        });

        Ok(id.to_string())
    }

    async fn list_recent(
        &self,
        collection: Collection,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let records = self.records.read().await;

        let mut matching: Vec<&StoredRecord> = records
            .iter()
            .filter(|r| r.collection == collection)
            .collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|r| r.document.clone())
            .collect())
    }

    async fn delete_by_ids(
        &self,
        collection: Collection,
        ids: &[String],
    ) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !(r.collection == collection && ids.contains(&r.id)));
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_lists_newest_first() {
        let store = MemoryRecordStore::new();
        let now = Utc::now();

        store
            .archive(Collection::International, "a", now - Duration::hours(2), json!({"id": "a"}))
            .await
            .unwrap();
        store
            .archive(Collection::International, "b", now, json!({"id": "b"}))
            .await
            .unwrap();
        store
            .archive(Collection::International, "c", now - Duration::hours(1), json!({"id": "c"}))
            .await
            .unwrap();

        let docs = store.list_recent(Collection::International, 10).await.unwrap();
        let ids: Vec<&str> = docs.iter().filter_map(|d| d["id"].as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let docs = store.list_recent(Collection::International, 1).await.unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_collections_are_separate() {
        let store = MemoryRecordStore::new();
        let now = Utc::now();

        store
            .archive(Collection::International, "same", now, json!({"market": "intl"}))
            .await
            .unwrap();
        store
            .archive(Collection::Uk, "same", now, json!({"market": "uk"}))
            .await
            .unwrap();

        let uk = store.list_recent(Collection::Uk, 10).await.unwrap();
        assert_eq!(uk, vec![json!({"market": "uk"})]);

        let deleted = store
            .delete_by_ids(Collection::Uk, &["same".to_string()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.list_recent(Collection::International, 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_rejects_duplicate_ids() {
        let store = MemoryRecordStore::new();
        let now = Utc::now();

        store
            .archive(Collection::Uk, "dup", now, json!({}))
            .await
            .unwrap();
        let err = store
            .archive(Collection::Uk, "dup", now, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_memory_store_delete_counts_only_matches() {
        let store = MemoryRecordStore::new();
        let now = Utc::now();

        for id in ["a", "b", "c"] {
            store
                .archive(Collection::International, id, now, json!({"id": id}))
                .await
                .unwrap();
        }

        let deleted = store
            .delete_by_ids(
                Collection::International,
                &["a".to_string(), "c".to_string(), "missing".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.list_recent(Collection::International, 10).await.unwrap().len(), 1);
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::International.as_str(), "calculations");
        assert_eq!(Collection::Uk.as_str(), "uk_calculations");
    }
}
