//! TMDB API Data Transfer Objects
//!
//! These types match EXACTLY what the TMDB v3 API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the tmdb module - convert to domain types.
//!
//! API Reference: https://developer.themoviedb.org/reference
//!
//! We use /search/movie and /search/tv to resolve filenames to ids, then
//! /movie/{id} and /tv/{id} with append_to_response=credits,similar for the
//! full records, plus /tv/{id}/season/{n} for the matched season's episodes.

use serde::{Deserialize, Serialize};

/// Paged search response (movie search)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieSearchResponse {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSearchResult>,
    pub total_results: Option<u64>,
}

/// One movie search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieSearchResult {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
}

/// Paged search response (TV search)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvSearchResponse {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TvSearchResult>,
    pub total_results: Option<u64>,
}

/// One TV search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvSearchResult {
    pub id: i64,
    pub name: String,
    pub first_air_date: Option<String>,
}

/// Movie details with credits and similar appended
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<Company>,
    pub credits: Option<Credits>,
    pub similar: Option<SimilarMovies>,
}

/// TV show details with credits and similar appended
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvDetails {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<Company>,
    pub credits: Option<Credits>,
    pub similar: Option<SimilarShows>,
    /// Season summaries; episodes come from the per-season endpoint
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

/// Genre reference
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// Production company reference
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
}

/// Credits block (we only consume cast)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// One cast credit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CastMember {
    pub credit_id: String,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// Similar movies block
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarMovies {
    #[serde(default)]
    pub results: Vec<SimilarMovie>,
}

/// One similar movie
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarMovie {
    pub id: i64,
    pub title: String,
    pub poster_path: Option<String>,
}

/// Similar shows block
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarShows {
    #[serde(default)]
    pub results: Vec<SimilarShow>,
}

/// One similar show
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarShow {
    pub id: i64,
    pub name: String,
    pub poster_path: Option<String>,
}

/// Season summary on the show record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub season_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

/// Full season record from /tv/{id}/season/{n}
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeasonDetails {
    pub id: i64,
    pub season_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeDto>,
}

/// One episode on a season record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EpisodeDto {
    pub id: i64,
    pub episode_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
}

/// TMDB error body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub status_code: i64,
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_movie_details() {
        let json = r#"{
            "id": 949,
            "title": "Heat",
            "overview": "Obsessive master thief Neil McCauley...",
            "release_date": "1995-12-15",
            "runtime": 170,
            "poster_path": "/heat.jpg",
            "backdrop_path": null,
            "genres": [{"id": 28, "name": "Action"}],
            "production_companies": [{"id": 508, "name": "Regency", "logo_path": null}],
            "credits": {"cast": [{"credit_id": "52fe42", "name": "Al Pacino", "character": "Vincent Hanna", "profile_path": null}]},
            "similar": {"results": [{"id": 111, "title": "Scarface", "poster_path": null}]}
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.id, 949);
        assert_eq!(details.genres[0].name, "Action");
        assert_eq!(details.credits.unwrap().cast[0].name, "Al Pacino");
    }

    #[test]
    fn test_decode_search_with_missing_optional_blocks() {
        let json = r#"{"page": 1, "results": [], "total_results": 0}"#;
        let resp: MovieSearchResponse = serde_json::from_str(json).unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn test_decode_season_details() {
        let json = r#"{
            "id": 3624,
            "season_number": 1,
            "name": "Season 1",
            "overview": null,
            "poster_path": null,
            "episodes": [{"id": 63056, "episode_number": 1, "name": "Winter Is Coming", "overview": null, "air_date": "2011-04-17", "still_path": null}]
        }"#;
        let season: SeasonDetails = serde_json::from_str(json).unwrap();
        assert_eq!(season.episodes[0].episode_number, 1);
    }
}
