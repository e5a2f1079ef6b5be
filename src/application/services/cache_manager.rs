use crate::domain::repositories::{AnimeCacheRepository, SearchCacheRepository};
use crate::log_info;
use crate::shared::errors::AppResult;
use serde::Serialize;
use std::sync::Arc;

/// Combined entry count above which `should_clean` asks the external
/// scheduler to act.
const CLEAN_THRESHOLD: u64 = 1000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub anime_entries: u64,
    pub search_entries: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearReport {
    pub before: CacheStats,
    pub after: CacheStats,
    pub anime_removed: u64,
    pub search_removed: u64,
}

/// Manages the durable secondary caches. No TTL auto-expiry: entries live
/// until an explicit bulk clear, or until the external scheduler polls
/// `should_clean` and decides to act.
pub struct CacheManager {
    anime_cache: Arc<dyn AnimeCacheRepository>,
    search_cache: Arc<dyn SearchCacheRepository>,
}

impl CacheManager {
    pub fn new(
        anime_cache: Arc<dyn AnimeCacheRepository>,
        search_cache: Arc<dyn SearchCacheRepository>,
    ) -> Self {
        Self {
            anime_cache,
            search_cache,
        }
    }

    pub async fn stats(&self) -> AppResult<CacheStats> {
        let anime_entries = self.anime_cache.count().await?;
        let search_entries = self.search_cache.count().await?;
        Ok(CacheStats {
            anime_entries,
            search_entries,
            total: anime_entries + search_entries,
        })
    }

    /// Bulk invalidation of both stores, reporting before/after counts.
    pub async fn clear_all(&self) -> AppResult<CacheClearReport> {
        let before = self.stats().await?;

        let anime_removed = self.anime_cache.clear().await?;
        let search_removed = self.search_cache.clear().await?;

        let after = self.stats().await?;
        log_info!(
            "Cache cleared: {} anime entries, {} search entries removed",
            anime_removed,
            search_removed
        );

        Ok(CacheClearReport {
            before,
            after,
            anime_removed,
            search_removed,
        })
    }

    /// Targeted invalidation of one cached search result.
    pub async fn clear_search(&self, query: &str) -> AppResult<bool> {
        let removed = self.search_cache.remove(query).await?;
        if removed {
            log_info!("Search cache entry removed for '{}'", query);
        }
        Ok(removed)
    }

    /// Polled by an external scheduler; cleaning itself stays manual.
    pub async fn should_clean(&self) -> AppResult<bool> {
        Ok(self.stats().await?.total > CLEAN_THRESHOLD)
    }
}
