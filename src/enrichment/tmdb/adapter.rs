//! Convert TMDB DTOs into domain types.
//!
//! The only place TMDB response shapes and our enriched records meet.

use super::dto;
use crate::enrichment::domain::{
    CompanyRef, CreditRef, EnrichedEpisode, EnrichedMovie, EnrichedSeason, EnrichedTvShow,
    GenreRef, SimilarTitle,
};

/// Build an [`EnrichedMovie`] from a details response.
pub fn to_enriched_movie(details: dto::MovieDetails, fs_path: String) -> EnrichedMovie {
    EnrichedMovie {
        tmdb_id: details.id,
        title: details.title,
        overview: details.overview,
        release_date: details.release_date,
        runtime: details.runtime,
        poster_path: details.poster_path,
        backdrop_path: details.backdrop_path,
        fs_path,
        genres: to_genres(details.genres),
        companies: to_companies(details.production_companies),
        credits: to_credits(details.credits),
        similar: details
            .similar
            .map(|s| {
                s.results
                    .into_iter()
                    .map(|m| SimilarTitle {
                        tmdb_id: m.id,
                        title: m.title,
                        poster_path: m.poster_path,
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Build an [`EnrichedTvShow`] from show details plus the matched season.
///
/// The matched season's summary entry is replaced by the full season record
/// with episodes; the episode matching `episode_number` carries `fs_path`.
/// Returns `None` if that episode number is absent from the season.
pub fn to_enriched_show(
    details: dto::TvDetails,
    season: dto::SeasonDetails,
    episode_number: i64,
    fs_path: String,
) -> Option<EnrichedTvShow> {
    if !season.episodes.iter().any(|e| e.episode_number == episode_number) {
        return None;
    }

    let matched_season_id = season.id;
    let matched = to_enriched_season(season, episode_number, &fs_path);

    let seasons = details
        .seasons
        .into_iter()
        .map(|summary| {
            if summary.id == matched_season_id {
                matched.clone()
            } else {
                EnrichedSeason {
                    tmdb_id: summary.id,
                    season_number: summary.season_number,
                    name: summary.name,
                    overview: summary.overview,
                    poster_path: summary.poster_path,
                    episodes: Vec::new(),
                }
            }
        })
        .collect();

    Some(EnrichedTvShow {
        tmdb_id: details.id,
        name: details.name,
        overview: details.overview,
        first_air_date: details.first_air_date,
        poster_path: details.poster_path,
        backdrop_path: details.backdrop_path,
        genres: to_genres(details.genres),
        companies: to_companies(details.production_companies),
        credits: to_credits(details.credits),
        similar: details
            .similar
            .map(|s| {
                s.results
                    .into_iter()
                    .map(|m| SimilarTitle {
                        tmdb_id: m.id,
                        title: m.name,
                        poster_path: m.poster_path,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        seasons,
    })
}

fn to_enriched_season(
    season: dto::SeasonDetails,
    episode_number: i64,
    fs_path: &str,
) -> EnrichedSeason {
    EnrichedSeason {
        tmdb_id: season.id,
        season_number: season.season_number,
        name: season.name,
        overview: season.overview,
        poster_path: season.poster_path,
        episodes: season
            .episodes
            .into_iter()
            .map(|e| EnrichedEpisode {
                tmdb_id: e.id,
                episode_number: e.episode_number,
                name: e.name,
                overview: e.overview,
                air_date: e.air_date,
                still_path: e.still_path,
                fs_path: (e.episode_number == episode_number).then(|| fs_path.to_string()),
            })
            .collect(),
    }
}

fn to_genres(genres: Vec<dto::Genre>) -> Vec<GenreRef> {
    genres
        .into_iter()
        .map(|g| GenreRef {
            tmdb_id: g.id,
            name: g.name,
        })
        .collect()
}

fn to_companies(companies: Vec<dto::Company>) -> Vec<CompanyRef> {
    companies
        .into_iter()
        .map(|c| CompanyRef {
            tmdb_id: c.id,
            name: c.name,
            logo_path: c.logo_path,
        })
        .collect()
}

fn to_credits(credits: Option<dto::Credits>) -> Vec<CreditRef> {
    credits
        .map(|c| {
            c.cast
                .into_iter()
                .map(|m| CreditRef {
                    credit_id: m.credit_id,
                    name: m.name,
                    character: m.character,
                    profile_path: m.profile_path,
                })
                .collect()
        })
        .unwrap_or_default()
}
