//! Media enrichment module - resolves file paths to external metadata.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`tmdb/dto.rs`, `spotify/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Naming** - Filename and directory-layout parsing into search terms
//! - **Traits** - Provider capabilities the reconciliation engine consumes
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap providers without changing the engine
//!
//! A lookup has three outcomes: `Found` (a full enriched record),
//! `NotFound` (the provider had no match - routed to the not-available
//! registry), and `Err(EnrichmentError)` for genuine transport or provider
//! failures.

pub mod domain;
pub mod naming;
pub mod spotify;
pub mod tmdb;
pub mod traits;

pub use domain::{
    EnrichedAlbum, EnrichedMovie, EnrichedTvShow, EnrichmentError, Lookup,
};
pub use spotify::SpotifyClient;
pub use tmdb::TmdbClient;
pub use traits::{AlbumLookup, MovieLookup, TvLookup};

use async_trait::async_trait;
use std::path::Path;

// Implement the provider traits for the real clients

#[async_trait]
impl MovieLookup for TmdbClient {
    async fn find_movie(&self, path: &Path) -> Result<Lookup<EnrichedMovie>, EnrichmentError> {
        self.find_movie(path).await
    }
}

#[async_trait]
impl TvLookup for TmdbClient {
    async fn find_show(&self, path: &Path) -> Result<Lookup<EnrichedTvShow>, EnrichmentError> {
        self.find_show(path).await
    }
}

#[async_trait]
impl AlbumLookup for SpotifyClient {
    async fn find_album(&self, path: &Path) -> Result<Lookup<EnrichedAlbum>, EnrichmentError> {
        self.find_album(path).await
    }
}
