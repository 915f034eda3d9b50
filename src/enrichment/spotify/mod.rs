//! Spotify provider for album enrichment.
//!
//! Layout follows the dto / client / adapter split: DTOs mirror the API
//! exactly, the client speaks HTTP (including the client-credentials token
//! flow), the adapter converts to domain types.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::SpotifyClient;
