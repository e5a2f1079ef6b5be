use crate::domain::entities::{Anime, Genre};
use crate::domain::traits::ShardFetcher;
use crate::infrastructure::cdn::CdnConfig;
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::TimedOperation;
use crate::{log_error, log_info};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A complete, internally consistent catalog at one point in time.
/// Snapshots are immutable; reloads build a new one and swap it in.
pub struct CatalogSnapshot {
    pub records: Vec<Anime>,
    by_id: HashMap<i32, usize>,
}

impl CatalogSnapshot {
    fn new(records: Vec<Anime>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, anime) in records.iter().enumerate() {
            // Merged shards can repeat an id; the first occurrence wins.
            by_id.entry(anime.mal_id).or_insert(idx);
        }
        Self { records, by_id }
    }

    fn empty() -> Self {
        Self {
            records: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn get(&self, mal_id: i32) -> Option<&Anime> {
        self.by_id.get(&mal_id).map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load state published together with the snapshot, so readers always see a
/// matching pair.
struct CatalogState {
    snapshot: Arc<CatalogSnapshot>,
    is_loaded: bool,
    last_load_time: Option<DateTime<Utc>>,
    load_error: Option<String>,
    shard_count: usize,
}

impl CatalogState {
    fn initial() -> Self {
        Self {
            snapshot: Arc::new(CatalogSnapshot::empty()),
            is_loaded: false,
            last_load_time: None,
            load_error: None,
            shard_count: 0,
        }
    }
}

/// Operational view of the loader, for status endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub is_loaded: bool,
    pub record_count: usize,
    pub shard_count: usize,
    pub last_load_time: Option<DateTime<Utc>>,
    pub load_error: Option<String>,
}

/// Owns the in-memory catalog: fetches all shards concurrently, normalizes
/// and merges them, and publishes the result as one atomic snapshot swap.
///
/// A failed reload never touches the previous good snapshot; serving stale
/// data is preferred over serving nothing.
pub struct CatalogService {
    fetcher: Arc<dyn ShardFetcher>,
    config: CdnConfig,
    state: RwLock<CatalogState>,
    /// Serializes loads so `ensure_loaded` callers await an in-flight load
    /// instead of starting their own.
    load_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(fetcher: Arc<dyn ShardFetcher>, config: CdnConfig) -> Self {
        Self {
            fetcher,
            config,
            state: RwLock::new(CatalogState::initial()),
            load_lock: Mutex::new(()),
        }
    }

    /// Load the catalog unless a fresh snapshot already exists.
    ///
    /// Individual shard failures are tolerated; only a total failure (every
    /// shard down) fails the call, leaving any previous snapshot in place.
    pub async fn preload(&self, force_reload: bool) -> AppResult<Arc<CatalogSnapshot>> {
        if !force_reload {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return Ok(snapshot);
            }
        }

        let _guard = self.load_lock.lock().await;

        // A concurrent caller may have finished the load while we waited.
        if !force_reload {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return Ok(snapshot);
            }
        }

        self.load_shards().await
    }

    /// Gate used by every read path: loads on first use and refuses to
    /// answer from a poisoned state.
    pub async fn ensure_loaded(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let loaded = { self.state.read().await.is_loaded };
        if !loaded {
            self.preload(false).await?;
        }

        let state = self.state.read().await;
        if let Some(error) = &state.load_error {
            return Err(AppError::LoadError(error.clone()));
        }
        Ok(state.snapshot.clone())
    }

    /// Current snapshot regardless of freshness; empty before the first
    /// successful load.
    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn stats(&self) -> CatalogStats {
        let state = self.state.read().await;
        CatalogStats {
            is_loaded: state.is_loaded,
            record_count: state.snapshot.len(),
            shard_count: state.shard_count,
            last_load_time: state.last_load_time,
            load_error: state.load_error.clone(),
        }
    }

    /// Manual reload trigger for the operational surface.
    pub async fn force_reload(&self) -> AppResult<CatalogStats> {
        log_info!("Forcing catalog reload");
        self.preload(true).await?;
        Ok(self.stats().await)
    }

    /// Distinct genres across the snapshot, sorted by name.
    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        let snapshot = self.ensure_loaded().await?;

        let mut by_id: HashMap<i32, Genre> = HashMap::new();
        for anime in &snapshot.records {
            for genre in &anime.genres {
                by_id.entry(genre.mal_id).or_insert_with(|| genre.clone());
            }
        }

        let mut genres: Vec<Genre> = by_id.into_values().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    /// Plain paged listing of the snapshot in shard order.
    pub async fn list(&self, page: u32, per_page: u32) -> AppResult<PaginatedResult<Anime>> {
        let snapshot = self.ensure_loaded().await?;
        let params = PaginationParams::new(page, per_page);
        Ok(PaginatedResult::paginate(snapshot.records.clone(), &params))
    }

    async fn fresh_snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        let state = self.state.read().await;
        if !state.is_loaded {
            return None;
        }
        let last = state.last_load_time?;
        let age = Utc::now().signed_duration_since(last);
        if age.to_std().unwrap_or_default() < self.config.reload_interval {
            Some(state.snapshot.clone())
        } else {
            None
        }
    }

    /// Fetch every shard, settle-all: one future per shard, none aborts the
    /// others, failures are collected per shard.
    async fn load_shards(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let timer = TimedOperation::new("catalog preload");
        log_info!("Loading catalog from {} shards", self.config.urls.len());

        let fetches = self.config.urls.iter().map(|url| {
            let fetcher = Arc::clone(&self.fetcher);
            async move { (url.as_str(), fetcher.fetch_shard(url).await) }
        });

        let results = futures::future::join_all(fetches).await;

        let mut records = Vec::new();
        let mut successful_shards = 0;
        for (url, result) in results {
            match result {
                Ok(batch) => {
                    successful_shards += 1;
                    records.extend(batch);
                }
                Err(err) => {
                    log_error!("Shard {} failed: {}", url, err);
                }
            }
        }

        if successful_shards == 0 {
            let message = "No shard could be loaded".to_string();
            let mut state = self.state.write().await;
            state.load_error = Some(message.clone());
            // Previous snapshot and is_loaded stay untouched.
            return Err(AppError::LoadError(message));
        }

        let snapshot = Arc::new(CatalogSnapshot::new(records));

        {
            let mut state = self.state.write().await;
            *state = CatalogState {
                snapshot: Arc::clone(&snapshot),
                is_loaded: true,
                last_load_time: Some(Utc::now()),
                load_error: None,
                shard_count: successful_shards,
            };
        }

        timer.finish_with_info(&format!(
            "{} records from {}/{} shards",
            snapshot.len(),
            successful_shards,
            self.config.urls.len()
        ));

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AnimeImages;
    use std::time::Duration;

    mockall::mock! {
        Fetcher {}

        #[async_trait::async_trait]
        impl ShardFetcher for Fetcher {
            async fn fetch_shard(&self, url: &str) -> AppResult<Vec<Anime>>;
        }
    }

    fn sample(mal_id: i32) -> Anime {
        Anime {
            mal_id,
            title: format!("Anime {}", mal_id),
            title_english: None,
            title_japanese: None,
            synopsis: None,
            genres: Vec::new(),
            score: None,
            popularity: None,
            episodes: None,
            year: None,
            season: None,
            images: AnimeImages::default(),
            trailer: None,
        }
    }

    fn config(urls: &[&str]) -> CdnConfig {
        CdnConfig {
            urls: urls.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(1),
            max_retries: 0,
            retry_delay: Duration::from_millis(1),
            reload_interval: Duration::from_secs(3600),
        }
    }

    #[tokio::test]
    async fn concurrent_readers_share_one_load() {
        let mut fetcher = MockFetcher::new();
        // The load mutex must collapse concurrent first reads into a
        // single shard download.
        fetcher
            .expect_fetch_shard()
            .times(1)
            .returning(|_| Ok(vec![sample(1)]));

        let service = Arc::new(CatalogService::new(
            Arc::new(fetcher),
            config(&["shard://1"]),
        ));

        let (a, b) = tokio::join!(service.ensure_loaded(), service.ensure_loaded());
        assert_eq!(a.unwrap().len(), 1);
        assert_eq!(b.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn readers_observe_old_or_new_snapshot_never_a_mix() {
        let mut fetcher = MockFetcher::new();
        let mut batches = vec![vec![sample(1)], vec![sample(2), sample(3)]];
        batches.reverse();
        fetcher
            .expect_fetch_shard()
            .times(2)
            .returning(move |_| Ok(batches.pop().unwrap()));

        let service = CatalogService::new(Arc::new(fetcher), config(&["shard://1"]));

        let before = service.preload(false).await.unwrap();
        let after = service.preload(true).await.unwrap();

        // The first Arc still points at the complete old snapshot.
        assert_eq!(before.len(), 1);
        assert!(before.get(1).is_some());
        assert_eq!(after.len(), 2);
        assert!(after.get(2).is_some());
    }
}
