//! Core data models for the media catalog.
//!
//! Defines the persisted entities: [`Movie`], [`TvShow`], [`Season`],
//! [`Episode`], [`Album`], [`Artist`], [`Song`], and [`NotAvailable`].
//! These are derived from SQLx for database mapping.
//!
//! # Database Schema
//!
//! Top-level entities are keyed by their external provider id (TMDB for
//! movies/TV, Spotify for music). The `fs_path` columns join catalog rows
//! back to files on disk and are unique within their own table; the three
//! library roots are disjoint by configuration, so a path identifies its
//! media kind.

use sqlx::FromRow;
use std::fmt;

/// Which library root a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    TvEpisode,
    Song,
}

impl MediaKind {
    /// Stable string form used in the `not_available` table.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::TvEpisode => "tv_episode",
            MediaKind::Song => "song",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "tv_episode" => Some(MediaKind::TvEpisode),
            "song" => Some(MediaKind::Song),
            _ => None,
        }
    }

    /// All kinds, in the order sync passes process them.
    pub const ALL: [MediaKind; 3] = [MediaKind::Movie, MediaKind::TvEpisode, MediaKind::Song];
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    /// TMDB id (primary key)
    pub tmdb_id: i64,
    /// Movie title
    pub title: String,
    /// Plot overview
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD)
    pub release_date: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<i64>,
    /// TMDB poster path
    pub poster_path: Option<String>,
    /// TMDB backdrop path
    pub backdrop_path: Option<String>,
    /// Absolute file path on disk (unique)
    pub fs_path: String,
    /// RFC 3339 timestamp of first insertion
    pub added_at: String,
}

/// A TV show in the catalog. Shows carry no `fs_path`; episodes do.
#[derive(Debug, Clone, FromRow)]
pub struct TvShow {
    /// TMDB id (primary key)
    pub tmdb_id: i64,
    /// Show name
    pub name: String,
    /// Plot overview
    pub overview: Option<String>,
    /// First air date (YYYY-MM-DD)
    pub first_air_date: Option<String>,
    /// TMDB poster path
    pub poster_path: Option<String>,
    /// TMDB backdrop path
    pub backdrop_path: Option<String>,
    /// RFC 3339 timestamp of first insertion
    pub added_at: String,
}

/// A season belonging to a [`TvShow`].
#[derive(Debug, Clone, FromRow)]
pub struct Season {
    /// TMDB id (primary key)
    pub tmdb_id: i64,
    /// Owning show's TMDB id
    pub show_tmdb_id: i64,
    /// Season number within the show
    pub season_number: i64,
    /// Season name
    pub name: Option<String>,
    /// Season overview
    pub overview: Option<String>,
    /// TMDB poster path
    pub poster_path: Option<String>,
}

/// An episode belonging to a [`Season`].
///
/// `fs_path` is set only for episodes actually present on disk; enrichment
/// returns a season's full episode list.
#[derive(Debug, Clone, FromRow)]
pub struct Episode {
    /// TMDB id (primary key)
    pub tmdb_id: i64,
    /// Owning season's TMDB id
    pub season_tmdb_id: i64,
    /// Episode number within the season
    pub episode_number: i64,
    /// Episode name
    pub name: Option<String>,
    /// Episode overview
    pub overview: Option<String>,
    /// Air date (YYYY-MM-DD)
    pub air_date: Option<String>,
    /// TMDB still path
    pub still_path: Option<String>,
    /// Absolute file path on disk, if present (unique)
    pub fs_path: Option<String>,
}

/// An album in the catalog.
#[derive(Debug, Clone, FromRow)]
pub struct Album {
    /// Spotify id (primary key)
    pub spotify_id: String,
    /// Album name
    pub name: String,
    /// Release date
    pub release_date: Option<String>,
    /// Total tracks on the album
    pub total_tracks: Option<i64>,
    /// Cover image URL
    pub image_url: Option<String>,
    /// RFC 3339 timestamp of first insertion
    pub added_at: String,
}

/// An artist credited on an [`Album`].
#[derive(Debug, Clone, FromRow)]
pub struct Artist {
    /// Spotify id (primary key)
    pub spotify_id: String,
    /// Artist name
    pub name: String,
    /// Artist image URL
    pub image_url: Option<String>,
}

/// A song belonging to an [`Album`].
///
/// `fs_path` is set only for songs actually present on disk.
#[derive(Debug, Clone, FromRow)]
pub struct Song {
    /// Spotify id (primary key)
    pub spotify_id: String,
    /// Owning album's Spotify id
    pub album_spotify_id: String,
    /// Song name
    pub name: String,
    /// Track number on the album
    pub track_number: Option<i64>,
    /// Duration in milliseconds
    pub duration_ms: Option<i64>,
    /// Absolute file path on disk, if present (unique)
    pub fs_path: Option<String>,
}

/// A path present on disk whose metadata lookup failed.
///
/// Such paths are excluded from insert attempts on later sync passes until
/// they disappear from disk, at which point the entry is purged.
#[derive(Debug, Clone, FromRow)]
pub struct NotAvailable {
    /// Absolute file path (primary key)
    pub fs_path: String,
    /// Stable string form of the path's [`MediaKind`]
    pub kind: String,
}
