use crate::application::services::catalog_service::CatalogService;
use crate::domain::entities::Anime;
use crate::domain::value_objects::Season;
use crate::shared::application::{PaginatedResult, PaginationParams};
use crate::shared::errors::{AppError, AppResult};
use chrono::{Datelike, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Selection thresholds for the two featured profiles.
const FEATURED_MIN_SCORE: f32 = 7.0;
const FEATURED_MIN_YEAR: i32 = 2020;
const HERO_MIN_SCORE: f32 = 7.5;
const HERO_MIN_YEAR: i32 = 2022;

/// Read-only operations over the loader's snapshot.
///
/// Every operation goes through `ensure_loaded`, so the first read triggers
/// a load instead of silently answering with an empty result.
pub struct QueryService {
    catalog: Arc<CatalogService>,
}

impl QueryService {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    pub async fn get_by_id(&self, mal_id: i32) -> AppResult<Anime> {
        let snapshot = self.catalog.ensure_loaded().await?;
        snapshot
            .get(mal_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Anime with ID {} not found", mal_id)))
    }

    /// Case-insensitive substring search across all title variants and the
    /// synopsis; a match in any field qualifies.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;
        let term = query.to_lowercase();

        let mut matches: Vec<Anime> = snapshot
            .records
            .iter()
            .filter(|anime| Self::matches_term(anime, &term))
            .cloned()
            .collect();

        matches.sort_by(Self::by_score_then_popularity);

        let params = PaginationParams::new(page, per_page);
        Ok(PaginatedResult::paginate(matches, &params))
    }

    pub async fn by_genre(
        &self,
        genre_id: i32,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;

        let mut matches: Vec<Anime> = snapshot
            .records
            .iter()
            .filter(|anime| anime.has_genre(genre_id))
            .cloned()
            .collect();

        matches.sort_by(Self::by_score_then_popularity);

        let params = PaginationParams::new(page, per_page);
        Ok(PaginatedResult::paginate(matches, &params))
    }

    /// Exact (year, season) match; the season arrives already normalized to
    /// its canonical form by the `Season` value object.
    pub async fn by_season(
        &self,
        year: i32,
        season: Season,
        page: u32,
        per_page: u32,
    ) -> AppResult<PaginatedResult<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;

        let matches: Vec<Anime> = snapshot
            .records
            .iter()
            .filter(|anime| anime.year == Some(year) && anime.season == Some(season))
            .cloned()
            .collect();

        let params = PaginationParams::new(page, per_page);
        Ok(PaginatedResult::paginate(matches, &params))
    }

    pub async fn top(&self, limit: usize) -> AppResult<Vec<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;

        let mut list: Vec<Anime> = snapshot
            .records
            .iter()
            .filter(|anime| anime.score_or_zero() > 0.0)
            .cloned()
            .collect();

        list.sort_by(|a, b| b.score_or_zero().total_cmp(&a.score_or_zero()));
        list.truncate(limit);
        Ok(list)
    }

    /// Records from the last three broadcast years, newest first.
    pub async fn recent(&self, limit: usize) -> AppResult<Vec<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;
        let cutoff = Utc::now().year() - 2;

        let mut list: Vec<Anime> = snapshot
            .records
            .iter()
            .filter(|anime| anime.year.map(|y| y >= cutoff).unwrap_or(false))
            .cloned()
            .collect();

        list.sort_by(|a, b| {
            b.year
                .unwrap_or(0)
                .cmp(&a.year.unwrap_or(0))
                .then_with(|| b.score_or_zero().total_cmp(&a.score_or_zero()))
        });
        list.truncate(limit);
        Ok(list)
    }

    pub async fn featured(&self, limit: usize) -> AppResult<Vec<Anime>> {
        self.featured_profile(FEATURED_MIN_SCORE, FEATURED_MIN_YEAR, limit)
            .await
    }

    /// Stricter profile for hero placements: recent, high-score titles.
    pub async fn hero_featured(&self, limit: usize) -> AppResult<Vec<Anime>> {
        self.featured_profile(HERO_MIN_SCORE, HERO_MIN_YEAR, limit)
            .await
    }

    /// Threshold filter, three-key sort, then de-duplication by id keeping
    /// the first occurrence. The de-dup is load-bearing: merged shards can
    /// carry the same id more than once.
    async fn featured_profile(
        &self,
        min_score: f32,
        min_year: i32,
        limit: usize,
    ) -> AppResult<Vec<Anime>> {
        let snapshot = self.catalog.ensure_loaded().await?;

        let mut list: Vec<&Anime> = snapshot
            .records
            .iter()
            .filter(|anime| {
                anime.score.map(|s| s >= min_score).unwrap_or(false)
                    && anime.year.map(|y| y >= min_year).unwrap_or(false)
            })
            .collect();

        list.sort_by(|a, b| {
            b.year
                .unwrap_or(0)
                .cmp(&a.year.unwrap_or(0))
                .then_with(|| b.score_or_zero().total_cmp(&a.score_or_zero()))
                .then_with(|| a.popularity_or_max().cmp(&b.popularity_or_max()))
        });

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(limit);
        for anime in list {
            if seen.insert(anime.mal_id) {
                unique.push(anime.clone());
                if unique.len() >= limit {
                    break;
                }
            }
        }
        Ok(unique)
    }

    fn matches_term(anime: &Anime, term: &str) -> bool {
        let field_matches = |field: &Option<String>| {
            field
                .as_deref()
                .map(|v| v.to_lowercase().contains(term))
                .unwrap_or(false)
        };

        anime.title.to_lowercase().contains(term)
            || field_matches(&anime.title_english)
            || field_matches(&anime.title_japanese)
            || field_matches(&anime.synopsis)
    }

    fn by_score_then_popularity(a: &Anime, b: &Anime) -> Ordering {
        b.score_or_zero()
            .total_cmp(&a.score_or_zero())
            .then_with(|| a.popularity_or_max().cmp(&b.popularity_or_max()))
    }
}
