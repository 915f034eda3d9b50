//! Test utilities and fixtures for media-minder tests.
//!
//! This module provides common test helpers and record factories to reduce
//! boilerplate in catalog and engine tests.

use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

use crate::enrichment::domain::{
    EnrichedAlbum, EnrichedArtist, EnrichedEpisode, EnrichedMovie, EnrichedSeason, EnrichedSong,
    EnrichedTvShow, GenreRef,
};

/// Creates a temporary database for testing.
///
/// The database is created in a temporary directory that is automatically
/// cleaned up when the returned `TempDir` is dropped. Migrations are run
/// automatically. Keep the TempDir alive for the duration of your test.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.display());

    let pool = crate::catalog::init_db(&db_url)
        .await
        .expect("Failed to initialize test database");

    (pool, dir)
}

/// An enriched movie with one genre, keyed by the given id.
pub fn sample_movie(tmdb_id: i64, fs_path: &str) -> EnrichedMovie {
    EnrichedMovie {
        tmdb_id,
        title: format!("Movie {tmdb_id}"),
        overview: Some("A test movie".to_string()),
        release_date: Some("1995-12-15".to_string()),
        runtime: Some(120),
        poster_path: None,
        backdrop_path: None,
        fs_path: fs_path.to_string(),
        genres: vec![GenreRef {
            tmdb_id: 28,
            name: "Action".to_string(),
        }],
        companies: vec![],
        credits: vec![],
        similar: vec![],
    }
}

/// An enriched show with one two-episode season; `fs_path` is attached to
/// the episode numbered `matched_episode`.
pub fn sample_show(show_id: i64, matched_episode: i64, fs_path: &str) -> EnrichedTvShow {
    let episodes = (1..=2)
        .map(|n| EnrichedEpisode {
            tmdb_id: show_id * 1000 + n,
            episode_number: n,
            name: Some(format!("Episode {n}")),
            overview: None,
            air_date: None,
            still_path: None,
            fs_path: (n == matched_episode).then(|| fs_path.to_string()),
        })
        .collect();

    EnrichedTvShow {
        tmdb_id: show_id,
        name: format!("Show {show_id}"),
        overview: None,
        first_air_date: None,
        poster_path: None,
        backdrop_path: None,
        genres: vec![],
        companies: vec![],
        credits: vec![],
        similar: vec![],
        seasons: vec![EnrichedSeason {
            tmdb_id: show_id * 100,
            season_number: 1,
            name: Some("Season 1".to_string()),
            overview: None,
            poster_path: None,
            episodes,
        }],
    }
}

/// An enriched album with one artist and one song carrying `fs_path`.
pub fn sample_album(spotify_id: &str, fs_path: &str) -> EnrichedAlbum {
    EnrichedAlbum {
        spotify_id: spotify_id.to_string(),
        name: format!("Album {spotify_id}"),
        release_date: Some("1977-01-14".to_string()),
        total_tracks: Some(1),
        image_url: None,
        artists: vec![EnrichedArtist {
            spotify_id: format!("{spotify_id}-artist"),
            name: "Test Artist".to_string(),
            image_url: None,
        }],
        songs: vec![EnrichedSong {
            spotify_id: format!("{spotify_id}-t1"),
            name: "One".to_string(),
            track_number: Some(1),
            duration_ms: Some(180_000),
            fs_path: Some(fs_path.to_string()),
        }],
    }
}
