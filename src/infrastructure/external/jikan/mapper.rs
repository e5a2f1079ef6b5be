use crate::domain::entities::{Anime, AnimeImages, Genre, ImageSet, Trailer};
use crate::domain::value_objects::Season;

use super::dto::{JikanAnimeData, JikanEntity, JikanImageSet, JikanImages, JikanTrailer};

/// Normalizer: maps raw provider records into the canonical record shape.
/// Pure functions, no I/O; everything missing on the wire becomes `None`.
pub struct JikanMapper;

impl JikanMapper {
    pub fn to_domain(dto: JikanAnimeData) -> Anime {
        Anime {
            mal_id: dto.mal_id,
            title: dto.title.unwrap_or_default(),
            title_english: dto.title_english,
            title_japanese: dto.title_japanese,
            synopsis: dto.synopsis,
            genres: Self::map_genres(dto.genres),
            score: dto.score,
            popularity: dto.popularity,
            episodes: dto.episodes,
            year: dto.year,
            season: dto.season.as_deref().and_then(Season::parse),
            images: Self::normalize_images(dto.images),
            trailer: dto.trailer.map(Self::map_trailer),
        }
    }

    /// Lift the provider image object into the canonical per-format shape.
    /// Both formats are always present afterwards, with `None` for any URL
    /// the provider omitted.
    pub fn normalize_images(images: Option<JikanImages>) -> AnimeImages {
        let images = images.unwrap_or_default();
        AnimeImages {
            jpg: Self::map_image_set(images.jpg),
            webp: Self::map_image_set(images.webp),
        }
    }

    fn map_image_set(set: Option<JikanImageSet>) -> ImageSet {
        let set = set.unwrap_or_default();
        ImageSet {
            image_url: set.image_url,
            small_image_url: set.small_image_url,
            large_image_url: set.large_image_url,
        }
    }

    fn map_genres(genres: Vec<JikanEntity>) -> Vec<Genre> {
        genres
            .into_iter()
            .map(|g| Genre::new(g.mal_id, g.name))
            .collect()
    }

    fn map_trailer(trailer: JikanTrailer) -> Trailer {
        Trailer {
            youtube_id: trailer.youtube_id,
            url: trailer.url,
            embed_url: trailer.embed_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_record() -> JikanAnimeData {
        serde_json::from_value(serde_json::json!({ "mal_id": 20 })).unwrap()
    }

    #[test]
    fn missing_fields_become_none_not_errors() {
        let anime = JikanMapper::to_domain(minimal_record());

        assert_eq!(anime.mal_id, 20);
        assert_eq!(anime.title, "");
        assert!(anime.score.is_none());
        assert!(anime.season.is_none());
        assert!(anime.genres.is_empty());
        assert!(anime.trailer.is_none());
    }

    #[test]
    fn image_formats_are_always_present_as_keys() {
        let anime = JikanMapper::to_domain(minimal_record());

        assert!(anime.images.jpg.image_url.is_none());
        assert!(anime.images.webp.large_image_url.is_none());

        let json = serde_json::to_value(&anime.images).unwrap();
        assert!(json.get("jpg").is_some());
        assert!(json.get("webp").is_some());
    }

    #[test]
    fn full_record_maps_into_canonical_shape() {
        let dto: JikanAnimeData = serde_json::from_value(serde_json::json!({
            "mal_id": 5114,
            "title": "Fullmetal Alchemist: Brotherhood",
            "title_english": "Fullmetal Alchemist: Brotherhood",
            "synopsis": "Two brothers search for the Philosopher's Stone.",
            "score": 9.1,
            "popularity": 3,
            "episodes": 64,
            "year": 2009,
            "season": "spring",
            "genres": [
                { "mal_id": 1, "name": "Action" },
                { "mal_id": 2, "name": "Adventure" }
            ],
            "images": {
                "jpg": { "image_url": "https://cdn.example/5114.jpg" }
            },
            "trailer": { "youtube_id": "--IcmZkvL0Q" }
        }))
        .unwrap();

        let anime = JikanMapper::to_domain(dto);

        assert_eq!(anime.season, Some(Season::Spring));
        assert_eq!(anime.genres.len(), 2);
        assert!(anime.has_genre(2));
        assert_eq!(
            anime.images.jpg.image_url.as_deref(),
            Some("https://cdn.example/5114.jpg")
        );
        assert!(anime.images.webp.image_url.is_none());
        assert_eq!(
            anime.trailer.unwrap().youtube_id.as_deref(),
            Some("--IcmZkvL0Q")
        );
    }
}
