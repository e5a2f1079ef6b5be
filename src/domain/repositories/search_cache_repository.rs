use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Durable cache of previously computed search results, keyed by the
/// lowercased query string.
#[async_trait]
pub trait SearchCacheRepository: Send + Sync {
    async fn get(&self, query: &str) -> AppResult<Option<serde_json::Value>>;
    async fn put(&self, query: &str, results: serde_json::Value) -> AppResult<()>;
    /// Returns true when an entry existed and was removed.
    async fn remove(&self, query: &str) -> AppResult<bool>;
    async fn count(&self) -> AppResult<u64>;
    /// Remove every entry; returns the number of deleted rows.
    async fn clear(&self) -> AppResult<u64>;
}
