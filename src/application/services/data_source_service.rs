use crate::application::services::query_service::QueryService;
use crate::domain::entities::Anime;
use crate::domain::repositories::{AnimeCacheRepository, SearchCacheRepository};
use crate::domain::traits::AnimeProviderClient;
use crate::domain::value_objects::{DataSourceInfo, DataSourceMode, Routed, Season};
use crate::shared::application::PaginatedResult;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error, log_warn};
use std::env;
use std::future::Future;
use std::sync::Arc;

const MODE_VAR: &str = "KAGAMI_DATA_SOURCE";
const FORCE_EXTERNAL_VAR: &str = "KAGAMI_FORCE_EXTERNAL";

/// Selects, per call, which feed answers a logical read operation.
///
/// `primary` serves from the catalog snapshot, `external` always calls the
/// upstream API, `hybrid` prefers the snapshot and falls back on failure.
/// The configuration is re-read from the environment on every call so
/// runtime reconfiguration takes effect immediately. When both the primary
/// path and the fallback fail, the primary's error is what the caller sees.
pub struct DataSourceManager {
    query: Arc<QueryService>,
    provider: Arc<dyn AnimeProviderClient>,
    anime_cache: Arc<dyn AnimeCacheRepository>,
    search_cache: Arc<dyn SearchCacheRepository>,
}

impl DataSourceManager {
    pub fn new(
        query: Arc<QueryService>,
        provider: Arc<dyn AnimeProviderClient>,
        anime_cache: Arc<dyn AnimeCacheRepository>,
        search_cache: Arc<dyn SearchCacheRepository>,
    ) -> Self {
        Self {
            query,
            provider,
            anime_cache,
            search_cache,
        }
    }

    pub async fn get_anime(&self, mal_id: i32) -> AppResult<Routed<Anime>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "get_anime",
                self.query.get_by_id(mal_id),
                async {
                    self.provider.get_anime_by_id(mal_id).await?.ok_or_else(|| {
                        AppError::NotFound(format!("Anime with ID {} not found", mal_id))
                    })
                },
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(std::slice::from_ref(&routed.data)).await;
        }
        Ok(routed)
    }

    pub async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<Routed<PaginatedResult<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "search",
                self.query.search(query, page, per_page),
                self.provider.search_anime(query, page, per_page),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data.items).await;
            match serde_json::to_value(&routed.data.items) {
                Ok(json) => {
                    if let Err(err) = self.search_cache.put(&query.to_lowercase(), json).await {
                        log_warn!("Search cache write-through failed: {}", err);
                    }
                }
                Err(err) => log_warn!("Search cache serialization failed: {}", err),
            }
        }
        Ok(routed)
    }

    pub async fn top(&self, limit: u32) -> AppResult<Routed<Vec<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "top",
                self.query.top(limit as usize),
                self.provider.get_top_anime(limit),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data).await;
        }
        Ok(routed)
    }

    pub async fn recent(&self, limit: u32) -> AppResult<Routed<Vec<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "recent",
                self.query.recent(limit as usize),
                self.provider.get_recent_anime(limit),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data).await;
        }
        Ok(routed)
    }

    pub async fn featured(&self, limit: u32) -> AppResult<Routed<Vec<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "featured",
                self.query.featured(limit as usize),
                self.provider.get_featured_anime(limit),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data).await;
        }
        Ok(routed)
    }

    pub async fn hero_featured(&self, limit: u32) -> AppResult<Routed<Vec<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "hero_featured",
                self.query.hero_featured(limit as usize),
                self.provider.get_featured_anime(limit),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data).await;
        }
        Ok(routed)
    }

    pub async fn by_genre(
        &self,
        genre_id: i32,
        page: u32,
        per_page: u32,
    ) -> AppResult<Routed<PaginatedResult<Anime>>> {
        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "by_genre",
                self.query.by_genre(genre_id, page, per_page),
                self.provider.get_anime_by_genre(genre_id, page, per_page),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data.items).await;
        }
        Ok(routed)
    }

    /// The season name is normalized to its canonical form here, before
    /// either feed sees it.
    pub async fn by_season(
        &self,
        year: i32,
        season: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<Routed<PaginatedResult<Anime>>> {
        let season = Season::parse(season).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Invalid season '{}'. Must be one of: winter, spring, summer, fall",
                season
            ))
        })?;

        let mode = self.resolve_mode();
        let routed = self
            .route(
                mode,
                "by_season",
                self.query.by_season(year, season, page, per_page),
                self.provider.get_seasonal_anime(year, season, page, per_page),
            )
            .await?;

        if self.should_write_through(mode, &routed) {
            self.cache_records(&routed.data.items).await;
        }
        Ok(routed)
    }

    /// Currently resolved routing configuration, for the operational surface.
    pub fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            mode: self.resolve_mode(),
            force_external: Self::force_external(),
            configured_mode: env::var(MODE_VAR).ok(),
        }
    }

    /// Every logical operation flows through this one helper; no operation
    /// gets its own fallback rules.
    async fn route<T, P, E>(
        &self,
        mode: DataSourceMode,
        operation: &str,
        primary: P,
        external: E,
    ) -> AppResult<Routed<T>>
    where
        P: Future<Output = AppResult<T>>,
        E: Future<Output = AppResult<T>>,
    {
        if mode == DataSourceMode::External {
            log_debug!("{} routed to upstream ({} mode)", operation, mode);
            return Ok(Routed::external(external.await?, false));
        }

        match primary.await {
            Ok(data) => Ok(Routed::primary(data)),
            Err(primary_err) => {
                log_warn!(
                    "{} failed on catalog snapshot, falling back to upstream: {}",
                    operation,
                    primary_err
                );
                match external.await {
                    Ok(data) => Ok(Routed::external(data, true)),
                    Err(fallback_err) => {
                        // Root cause over the fallback's incidental error.
                        log_error!(
                            "{} fallback to upstream also failed: {}",
                            operation,
                            fallback_err
                        );
                        Err(primary_err)
                    }
                }
            }
        }
    }

    fn resolve_mode(&self) -> DataSourceMode {
        if Self::force_external() {
            return DataSourceMode::External;
        }
        env::var(MODE_VAR)
            .ok()
            .and_then(|v| DataSourceMode::parse(&v))
            .unwrap_or(DataSourceMode::Hybrid)
    }

    fn force_external() -> bool {
        env::var(FORCE_EXTERNAL_VAR)
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    fn should_write_through<T>(&self, mode: DataSourceMode, routed: &Routed<T>) -> bool {
        mode == DataSourceMode::Hybrid && routed.fell_back
    }

    /// Best-effort: a failed cache write never fails the read that
    /// produced the data.
    async fn cache_records(&self, records: &[Anime]) {
        for anime in records {
            match serde_json::to_value(anime) {
                Ok(json) => {
                    if let Err(err) = self.anime_cache.upsert(anime.mal_id, json).await {
                        log_warn!("Cache write-through for anime {} failed: {}", anime.mal_id, err);
                    }
                }
                Err(err) => {
                    log_warn!("Cache serialization for anime {} failed: {}", anime.mal_id, err)
                }
            }
        }
    }
}
