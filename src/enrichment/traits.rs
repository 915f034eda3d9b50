//! Trait definitions for the metadata providers.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations (TMDB for movies
//! and TV, Spotify for albums), while tests substitute mock
//! implementations. The reconciliation engine only ever sees these traits.

use async_trait::async_trait;
use std::path::Path;

use super::domain::{EnrichedAlbum, EnrichedMovie, EnrichedTvShow, EnrichmentError, Lookup};

/// Movie metadata lookup.
///
/// `Ok(Lookup::NotFound)` means the provider had no match - an expected
/// outcome, never an error.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    /// Look up the movie a file belongs to.
    async fn find_movie(&self, path: &Path) -> Result<Lookup<EnrichedMovie>, EnrichmentError>;
}

/// TV show metadata lookup, driven by an episode file.
#[async_trait]
pub trait TvLookup: Send + Sync {
    /// Look up the show (with seasons/episodes) an episode file belongs to.
    async fn find_show(&self, path: &Path) -> Result<Lookup<EnrichedTvShow>, EnrichmentError>;
}

/// Album metadata lookup, driven by a song file.
#[async_trait]
pub trait AlbumLookup: Send + Sync {
    /// Look up the album (with artists/songs) a song file belongs to.
    async fn find_album(&self, path: &Path) -> Result<Lookup<EnrichedAlbum>, EnrichmentError>;
}
