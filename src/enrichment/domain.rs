//! Internal domain models for metadata enrichment.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All provider responses get converted into these types via adapters, and
//! only these types cross into the catalog layer.

/// Outcome of a metadata lookup.
///
/// "Not found" is a first-class result, not an error: it routes the path
/// into the not-available registry and the batch continues. Errors are
/// reserved for genuine transport/provider failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The provider matched the file and returned a full record.
    Found(T),
    /// The provider had no match for this file.
    NotFound,
}

/// A genre reference (TMDB id + name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreRef {
    pub tmdb_id: i64,
    pub name: String,
}

/// A production company reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRef {
    pub tmdb_id: i64,
    pub name: String,
    pub logo_path: Option<String>,
}

/// A cast credit. Keyed by TMDB's credit id, which is unique per
/// person-per-title (the same actor in two movies has two credit ids).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditRef {
    pub credit_id: String,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// A similar-title reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarTitle {
    pub tmdb_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
}

/// Fully enriched movie record, ready for catalog upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedMovie {
    pub tmdb_id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i64>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// The file this record was enriched from
    pub fs_path: String,
    pub genres: Vec<GenreRef>,
    pub companies: Vec<CompanyRef>,
    pub credits: Vec<CreditRef>,
    pub similar: Vec<SimilarTitle>,
}

/// Fully enriched TV show record, including the matched season's episodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTvShow {
    pub tmdb_id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub genres: Vec<GenreRef>,
    pub companies: Vec<CompanyRef>,
    pub credits: Vec<CreditRef>,
    pub similar: Vec<SimilarTitle>,
    pub seasons: Vec<EnrichedSeason>,
}

/// A season within an [`EnrichedTvShow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSeason {
    pub tmdb_id: i64,
    pub season_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// Populated for the season the enriched file belongs to; other seasons
    /// carry an empty list.
    pub episodes: Vec<EnrichedEpisode>,
}

/// An episode within an [`EnrichedSeason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedEpisode {
    pub tmdb_id: i64,
    pub episode_number: i64,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub still_path: Option<String>,
    /// Set only on the episode that matched the enriched file
    pub fs_path: Option<String>,
}

/// Fully enriched album record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedAlbum {
    pub spotify_id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub total_tracks: Option<i64>,
    pub image_url: Option<String>,
    pub artists: Vec<EnrichedArtist>,
    pub songs: Vec<EnrichedSong>,
}

/// An artist credited on an [`EnrichedAlbum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedArtist {
    pub spotify_id: String,
    pub name: String,
    pub image_url: Option<String>,
}

/// A song on an [`EnrichedAlbum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedSong {
    pub spotify_id: String,
    pub name: String,
    pub track_number: Option<i64>,
    pub duration_ms: Option<i64>,
    /// Set only on the song that matched the enriched file
    pub fs_path: Option<String>,
}

/// Errors that can occur during enrichment.
///
/// These abort the remainder of the current media kind's insert batch;
/// unprocessed paths are retried on the next sync pass.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl EnrichedTvShow {
    /// The fs_path this record was enriched from, if any episode carries one.
    pub fn fs_path(&self) -> Option<&str> {
        self.seasons
            .iter()
            .flat_map(|s| s.episodes.iter())
            .find_map(|e| e.fs_path.as_deref())
    }
}

impl EnrichedAlbum {
    /// The fs_path this record was enriched from, if any song carries one.
    pub fn fs_path(&self) -> Option<&str> {
        self.songs.iter().find_map(|s| s.fs_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_fs_path_finds_matched_episode() {
        let show = EnrichedTvShow {
            tmdb_id: 1,
            name: "Show".to_string(),
            overview: None,
            first_air_date: None,
            poster_path: None,
            backdrop_path: None,
            genres: vec![],
            companies: vec![],
            credits: vec![],
            similar: vec![],
            seasons: vec![EnrichedSeason {
                tmdb_id: 10,
                season_number: 1,
                name: None,
                overview: None,
                poster_path: None,
                episodes: vec![
                    EnrichedEpisode {
                        tmdb_id: 100,
                        episode_number: 1,
                        name: None,
                        overview: None,
                        air_date: None,
                        still_path: None,
                        fs_path: None,
                    },
                    EnrichedEpisode {
                        tmdb_id: 101,
                        episode_number: 2,
                        name: None,
                        overview: None,
                        air_date: None,
                        still_path: None,
                        fs_path: Some("/tv/show/s01e02.mkv".to_string()),
                    },
                ],
            }],
        };
        assert_eq!(show.fs_path(), Some("/tv/show/s01e02.mkv"));
    }
}
