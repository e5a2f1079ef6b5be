use super::genre::Genre;
use crate::domain::value_objects::Season;
use serde::{Deserialize, Serialize};

/// Canonical catalog record.
///
/// Produced exclusively by the normalizer at the ingestion boundary; every
/// optional field is an explicit `Option` with `None` for anything the
/// provider omitted, so downstream code never probes for missing keys.
/// Records are immutable once placed in a snapshot; reloads replace the
/// whole snapshot rather than mutating records in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    pub mal_id: i32,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    pub synopsis: Option<String>,
    pub genres: Vec<Genre>,
    pub score: Option<f32>,
    /// Popularity rank; lower = more popular.
    pub popularity: Option<i32>,
    pub episodes: Option<i32>,
    pub year: Option<i32>,
    pub season: Option<Season>,
    pub images: AnimeImages,
    pub trailer: Option<Trailer>,
}

impl Anime {
    pub fn score_or_zero(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }

    /// Missing popularity sorts last among equals, same as a very high rank.
    pub fn popularity_or_max(&self) -> i32 {
        self.popularity.unwrap_or(999_999)
    }

    pub fn has_genre(&self, genre_id: i32) -> bool {
        self.genres.iter().any(|g| g.mal_id == genre_id)
    }
}

/// Canonical image variants: one set per supported format. Both formats are
/// always present as keys; individual URLs may be `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeImages {
    pub jpg: ImageSet,
    pub webp: ImageSet,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub youtube_id: Option<String>,
    pub url: Option<String>,
    pub embed_url: Option<String>,
}
