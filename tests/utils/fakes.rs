//! In-memory stand-ins for the network and database seams, so the suite
//! runs without a CDN, a Jikan instance, or a Postgres server.

use async_trait::async_trait;
use kagami::domain::entities::{Anime, AnimeImages, BackupProgress, Genre};
use kagami::domain::repositories::{
    AnimeCacheRepository, BackupProgressRepository, SearchCacheRepository, UpsertOutcome,
};
use kagami::domain::traits::{AnimeProviderClient, ShardFetcher};
use kagami::domain::value_objects::{PageInfo, RawPage, Season};
use kagami::shared::application::{PaginatedResult, PaginationParams};
use kagami::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a catalog record with just the fields the queries care about.
pub fn anime(mal_id: i32, title: &str, score: Option<f32>, popularity: Option<i32>) -> Anime {
    Anime {
        mal_id,
        title: title.to_string(),
        title_english: None,
        title_japanese: None,
        synopsis: None,
        genres: Vec::new(),
        score,
        popularity,
        episodes: None,
        year: None,
        season: None,
        images: AnimeImages::default(),
        trailer: None,
    }
}

pub fn anime_with_year(
    mal_id: i32,
    title: &str,
    score: Option<f32>,
    popularity: Option<i32>,
    year: i32,
    season: Option<Season>,
) -> Anime {
    let mut record = anime(mal_id, title, score, popularity);
    record.year = Some(year);
    record.season = season;
    record
}

pub fn with_genres(mut record: Anime, genres: &[(i32, &str)]) -> Anime {
    record.genres = genres.iter().map(|(id, name)| Genre::new(*id, *name)).collect();
    record
}

/// Shard fetcher answering from fixed per-URL record sets; URLs listed in
/// `failing` error instead. Counts fetches so tests can assert on reuse.
pub struct StaticShardFetcher {
    shards: HashMap<String, Vec<Anime>>,
    failing: Mutex<Vec<String>>,
    pub fetch_count: AtomicUsize,
}

impl StaticShardFetcher {
    pub fn new(shards: Vec<(&str, Vec<Anime>)>) -> Self {
        Self {
            shards: shards
                .into_iter()
                .map(|(url, records)| (url.to_string(), records))
                .collect(),
            failing: Mutex::new(Vec::new()),
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn failing_urls(self, urls: &[&str]) -> Self {
        *self.failing.lock().unwrap() = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = self.shards.keys().cloned().collect();
    }

    pub fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShardFetcher for StaticShardFetcher {
    async fn fetch_shard(&self, url: &str) -> AppResult<Vec<Anime>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().iter().any(|u| u == url) {
            return Err(AppError::ExternalServiceError(format!(
                "Shard {} unreachable",
                url
            )));
        }

        self.shards
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::ExternalServiceError(format!("Unknown shard {}", url)))
    }
}

/// Upstream stub: query operations answer from one fixed record list, the
/// crawler endpoints from fixed verbatim pages. `fail_all` makes every call
/// error; `fail_pages` makes specific crawler pages error.
pub struct StubProvider {
    pub records: Vec<Anime>,
    pub pages: Vec<Vec<serde_json::Value>>,
    pub per_page: u32,
    fail_all: AtomicBool,
    fail_pages: Vec<u32>,
    pub call_count: AtomicUsize,
}

impl StubProvider {
    pub fn with_records(records: Vec<Anime>) -> Self {
        Self {
            records,
            pages: Vec::new(),
            per_page: 25,
            fail_all: AtomicBool::new(false),
            fail_pages: Vec::new(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_pages(pages: Vec<Vec<serde_json::Value>>, per_page: u32) -> Self {
        Self {
            records: Vec::new(),
            pages,
            per_page,
            fail_all: AtomicBool::new(false),
            fail_pages: Vec::new(),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let stub = Self::with_records(Vec::new());
        stub.fail_all.store(true, Ordering::SeqCst);
        stub
    }

    pub fn failing_pages(mut self, pages: &[u32]) -> Self {
        self.fail_pages = pages.to_vec();
        self
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn guard(&self) -> AppResult<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_all.load(Ordering::SeqCst) {
            Err(AppError::ExternalServiceError(
                "Upstream unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn total_items(&self) -> u64 {
        self.pages.iter().map(|p| p.len() as u64).sum()
    }

    fn paginated(&self, items: Vec<Anime>, page: u32, per_page: u32) -> PaginatedResult<Anime> {
        let params = PaginationParams::new(page, per_page);
        PaginatedResult::paginate(items, &params)
    }
}

#[async_trait]
impl AnimeProviderClient for StubProvider {
    async fn get_anime_by_id(&self, mal_id: i32) -> AppResult<Option<Anime>> {
        self.guard()?;
        Ok(self.records.iter().find(|a| a.mal_id == mal_id).cloned())
    }

    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        self.guard()?;
        let term = query.to_lowercase();
        let matches = self
            .records
            .iter()
            .filter(|a| a.title.to_lowercase().contains(&term))
            .cloned()
            .collect();
        Ok(self.paginated(matches, page, per_page))
    }

    async fn get_top_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        self.guard()?;
        Ok(self.records.iter().take(limit as usize).cloned().collect())
    }

    async fn get_recent_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        self.guard()?;
        Ok(self.records.iter().take(limit as usize).cloned().collect())
    }

    async fn get_featured_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        self.guard()?;
        Ok(self.records.iter().take(limit as usize).cloned().collect())
    }

    async fn get_anime_by_genre(
        &self,
        genre_id: i32,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        self.guard()?;
        let matches = self
            .records
            .iter()
            .filter(|a| a.has_genre(genre_id))
            .cloned()
            .collect();
        Ok(self.paginated(matches, page, per_page))
    }

    async fn get_seasonal_anime(
        &self,
        year: i32,
        season: Season,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        self.guard()?;
        let matches = self
            .records
            .iter()
            .filter(|a| a.year == Some(year) && a.season == Some(season))
            .cloned()
            .collect();
        Ok(self.paginated(matches, page, per_page))
    }

    async fn pagination_info(&self, _per_page: u32) -> AppResult<PageInfo> {
        self.guard()?;
        Ok(PageInfo {
            current_page: 1,
            last_visible_page: self.pages.len() as u32,
            per_page: self.per_page,
            count: self.pages.first().map(|p| p.len() as u32).unwrap_or(0),
            total_items: self.total_items(),
        })
    }

    async fn fetch_page(&self, page: u32, _per_page: u32) -> AppResult<RawPage> {
        self.guard()?;
        if self.fail_pages.contains(&page) {
            return Err(AppError::ExternalServiceError(format!(
                "Page {} unavailable",
                page
            )));
        }
        let records = self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Page {} out of range", page)))?;
        Ok(RawPage {
            records,
            pagination: None,
        })
    }
}

#[derive(Default)]
pub struct InMemoryAnimeCache {
    entries: Mutex<HashMap<i32, serde_json::Value>>,
}

impl InMemoryAnimeCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnimeCacheRepository for InMemoryAnimeCache {
    async fn upsert(&self, anime_id: i32, data: serde_json::Value) -> AppResult<UpsertOutcome> {
        let mut entries = self.entries.lock().unwrap();
        match entries.insert(anime_id, data) {
            Some(_) => Ok(UpsertOutcome::Updated),
            None => Ok(UpsertOutcome::Created),
        }
    }

    async fn find(&self, anime_id: i32) -> AppResult<Option<serde_json::Value>> {
        Ok(self.entries.lock().unwrap().get(&anime_id).cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    async fn clear(&self) -> AppResult<u64> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemorySearchCache {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl InMemorySearchCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchCacheRepository for InMemorySearchCache {
    async fn get(&self, query: &str) -> AppResult<Option<serde_json::Value>> {
        Ok(self.entries.lock().unwrap().get(&query.to_lowercase()).cloned())
    }

    async fn put(&self, query: &str, results: serde_json::Value) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(query.to_lowercase(), results);
        Ok(())
    }

    async fn remove(&self, query: &str) -> AppResult<bool> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .remove(&query.to_lowercase())
            .is_some())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    async fn clear(&self) -> AppResult<u64> {
        let mut entries = self.entries.lock().unwrap();
        let removed = entries.len() as u64;
        entries.clear();
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryProgressRepo {
    rows: Mutex<HashMap<String, BackupProgress>>,
}

impl InMemoryProgressRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, progress: BackupProgress) {
        self.rows
            .lock()
            .unwrap()
            .insert(progress.job_type.clone(), progress);
    }
}

#[async_trait]
impl BackupProgressRepository for InMemoryProgressRepo {
    async fn find(&self, job_type: &str) -> AppResult<Option<BackupProgress>> {
        Ok(self.rows.lock().unwrap().get(job_type).cloned())
    }

    async fn save(&self, progress: &BackupProgress) -> AppResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(progress.job_type.clone(), progress.clone());
        Ok(())
    }
}
