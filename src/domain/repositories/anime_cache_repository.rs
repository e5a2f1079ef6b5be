use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Whether an upsert created a new row or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Durable store of full anime payloads, keyed by their external id.
///
/// Shared by the backup crawler (bulk upserts) and the hybrid routing
/// write-through; cleared only by explicit bulk operations.
#[async_trait]
pub trait AnimeCacheRepository: Send + Sync {
    async fn upsert(&self, anime_id: i32, data: serde_json::Value) -> AppResult<UpsertOutcome>;
    async fn find(&self, anime_id: i32) -> AppResult<Option<serde_json::Value>>;
    async fn count(&self) -> AppResult<u64>;
    /// Remove every entry; returns the number of deleted rows.
    async fn clear(&self) -> AppResult<u64>;
}
