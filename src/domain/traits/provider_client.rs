use crate::domain::entities::Anime;
use crate::domain::value_objects::{PageInfo, RawPage, Season};
use crate::shared::application::PaginatedResult;
use crate::shared::errors::AppResult;
use async_trait::async_trait;

/// Seam to the authoritative upstream API.
///
/// The data source router uses the query-shaped operations as its fallback
/// feed; the backup crawler walks the catalog through `pagination_info` and
/// `fetch_page`. Implemented by the Jikan client in production and by stubs
/// in tests.
#[async_trait]
pub trait AnimeProviderClient: Send + Sync {
    async fn get_anime_by_id(&self, mal_id: i32) -> AppResult<Option<Anime>>;

    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>>;

    async fn get_top_anime(&self, limit: u32) -> AppResult<Vec<Anime>>;

    async fn get_recent_anime(&self, limit: u32) -> AppResult<Vec<Anime>>;

    async fn get_featured_anime(&self, limit: u32) -> AppResult<Vec<Anime>>;

    async fn get_anime_by_genre(
        &self,
        genre_id: i32,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>>;

    async fn get_seasonal_anime(
        &self,
        year: i32,
        season: Season,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>>;

    /// Pagination metadata of the full catalog listing.
    async fn pagination_info(&self, per_page: u32) -> AppResult<PageInfo>;

    /// One catalog page with payloads kept verbatim for durable mirroring.
    async fn fetch_page(&self, page: u32, per_page: u32) -> AppResult<RawPage>;
}
