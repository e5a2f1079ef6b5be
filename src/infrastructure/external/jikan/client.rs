use crate::domain::entities::Anime;
use crate::domain::traits::AnimeProviderClient;
use crate::domain::value_objects::{PageInfo, RawPage, Season};
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::RateLimiter;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::env;

use super::dto::{JikanAnimeResponse, JikanListResponse, JikanRawListResponse};
use super::mapper::JikanMapper;

const DEFAULT_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Jikan caps list endpoints at 25 items per request.
const MAX_PAGE_SIZE: u32 = 25;

pub struct JikanClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl JikanClient {
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("kagami/0.1")
            .build()
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = env::var("JIKAN_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            // 3 requests per second, the official Jikan limit
            rate_limiter: RateLimiter::new(3.0),
        })
    }

    async fn get_list(&self, url: &str, query: &[(&str, String)]) -> AppResult<JikanListResponse> {
        self.rate_limiter.wait().await;

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::ApiError(format!("Jikan request failed: {}", e)))?;

        Self::handle_response_status(response.status())?;

        response
            .json::<JikanListResponse>()
            .await
            .map_err(|e| AppError::ApiError(format!("Failed to parse Jikan response: {}", e)))
    }

    fn map_list(response: JikanListResponse) -> Vec<Anime> {
        response.data.into_iter().map(JikanMapper::to_domain).collect()
    }

    fn map_paginated(
        response: JikanListResponse,
        page: u32,
        per_page: u32,
    ) -> PaginatedResult<Anime> {
        let params = PaginationParams::new(page, per_page);
        let pagination = response.pagination.clone();
        let items = Self::map_list(response);

        match pagination {
            Some(p) => PaginatedResult {
                total_pages: p.last_visible_page,
                total_items: p.items.total,
                page: p.current_page,
                per_page: params.per_page,
                items,
            },
            None => {
                let total = items.len() as u64;
                PaginatedResult::new(items, total, &params)
            }
        }
    }

    fn handle_response_status(status: StatusCode) -> AppResult<()> {
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::RateLimitError(
                "Jikan rate limit exceeded".to_string(),
            )),
            StatusCode::NOT_FOUND => Err(AppError::NotFound("Resource not found".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE => Err(
                AppError::ExternalServiceError("Jikan service unavailable".to_string()),
            ),
            _ => Err(AppError::ApiError(format!(
                "Unexpected status code: {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl AnimeProviderClient for JikanClient {
    async fn get_anime_by_id(&self, mal_id: i32) -> AppResult<Option<Anime>> {
        self.rate_limiter.wait().await;

        let url = format!("{}/anime/{}", self.base_url, mal_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ApiError(format!("Jikan get anime failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::handle_response_status(response.status())?;

        let jikan_response = response
            .json::<JikanAnimeResponse>()
            .await
            .map_err(|e| AppError::ApiError(format!("Failed to parse Jikan response: {}", e)))?;

        Ok(Some(JikanMapper::to_domain(jikan_response.data)))
    }

    async fn search_anime(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/anime", self.base_url);
        let response = self
            .get_list(
                &url,
                &[
                    ("q", query.trim().to_string()),
                    ("page", page.to_string()),
                    ("limit", per_page.min(MAX_PAGE_SIZE).to_string()),
                ],
            )
            .await?;

        Ok(Self::map_paginated(response, page, per_page))
    }

    async fn get_top_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        let url = format!("{}/top/anime", self.base_url);
        let response = self
            .get_list(&url, &[("limit", limit.min(MAX_PAGE_SIZE).to_string())])
            .await?;

        Ok(Self::map_list(response))
    }

    async fn get_recent_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        let url = format!("{}/seasons/now", self.base_url);
        let response = self
            .get_list(&url, &[("limit", limit.min(MAX_PAGE_SIZE).to_string())])
            .await?;

        Ok(Self::map_list(response))
    }

    async fn get_featured_anime(&self, limit: u32) -> AppResult<Vec<Anime>> {
        // The upstream has no featured feed; its top list is the closest
        // equivalent of the snapshot's featured profile.
        self.get_top_anime(limit).await
    }

    async fn get_anime_by_genre(
        &self,
        genre_id: i32,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        let url = format!("{}/anime", self.base_url);
        let response = self
            .get_list(
                &url,
                &[
                    ("genres", genre_id.to_string()),
                    ("page", page.to_string()),
                    ("limit", per_page.min(MAX_PAGE_SIZE).to_string()),
                    ("order_by", "score".to_string()),
                    ("sort", "desc".to_string()),
                ],
            )
            .await?;

        Ok(Self::map_paginated(response, page, per_page))
    }

    async fn get_seasonal_anime(
        &self,
        year: i32,
        season: Season,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        let url = format!("{}/seasons/{}/{}", self.base_url, year, season.api_name());
        let response = self.get_list(&url, &[("page", page.to_string())]).await?;

        Ok(Self::map_paginated(response, page, per_page))
    }

    async fn pagination_info(&self, per_page: u32) -> AppResult<PageInfo> {
        let url = format!("{}/anime", self.base_url);
        let response = self
            .get_list(
                &url,
                &[
                    ("page", "1".to_string()),
                    ("limit", per_page.min(MAX_PAGE_SIZE).to_string()),
                ],
            )
            .await?;

        response
            .pagination
            .map(PageInfo::from)
            .ok_or_else(|| AppError::ApiError("Jikan response missing pagination".to_string()))
    }

    async fn fetch_page(&self, page: u32, per_page: u32) -> AppResult<RawPage> {
        self.rate_limiter.wait().await;

        let url = format!("{}/anime", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("page", page.to_string()),
                ("limit", per_page.min(MAX_PAGE_SIZE).to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ApiError(format!("Jikan page fetch failed: {}", e)))?;

        Self::handle_response_status(response.status())?;

        let raw = response
            .json::<JikanRawListResponse>()
            .await
            .map_err(|e| AppError::ApiError(format!("Failed to parse Jikan response: {}", e)))?;

        Ok(RawPage {
            records: raw.data,
            pagination: raw.pagination.map(PageInfo::from),
        })
    }
}
