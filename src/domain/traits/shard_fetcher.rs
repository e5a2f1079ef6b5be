use crate::domain::entities::Anime;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Seam through which the catalog loader downloads one shard document.
///
/// Implementations own their transport concerns (timeout, retries) and
/// return records already normalized into the canonical shape.
#[async_trait]
pub trait ShardFetcher: Send + Sync {
    async fn fetch_shard(&self, url: &str) -> AppResult<Vec<Anime>>;
}
