use crate::domain::value_objects::PageInfo;
use serde::{Deserialize, Serialize};

/// Wire shapes shared by the Jikan API and the CDN shard documents (the
/// shards are pre-exported Jikan payloads). Every field the catalog does not
/// strictly require is defaulted, so partially filled records deserialize
/// instead of failing a whole shard.

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnimeResponse {
    pub data: JikanAnimeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanListResponse {
    pub data: Vec<JikanAnimeData>,
    #[serde(default)]
    pub pagination: Option<JikanPagination>,
}

/// Same envelope with payloads left untouched, for the backup crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct JikanRawListResponse {
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub pagination: Option<JikanPagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPagination {
    pub last_visible_page: u32,
    #[serde(default)]
    pub has_next_page: bool,
    pub current_page: u32,
    pub items: JikanPaginationItems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPaginationItems {
    pub count: u32,
    pub total: u64,
    pub per_page: u32,
}

impl From<JikanPagination> for PageInfo {
    fn from(p: JikanPagination) -> Self {
        PageInfo {
            current_page: p.current_page,
            last_visible_page: p.last_visible_page,
            per_page: p.items.per_page,
            count: p.items.count,
            total_items: p.items.total,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnimeData {
    pub mal_id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub genres: Vec<JikanEntity>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub popularity: Option<i32>,
    #[serde(default)]
    pub episodes: Option<i32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub trailer: Option<JikanTrailer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
    #[serde(default)]
    pub webp: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub small_image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanTrailer {
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanEntity {
    pub mal_id: i32,
    pub name: String,
}

/// Minimal typed view of a verbatim payload: just enough to key the upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct JikanRecordKey {
    pub mal_id: i32,
}
