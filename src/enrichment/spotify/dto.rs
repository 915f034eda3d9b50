//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify Web API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! We use the client-credentials token endpoint, /search with type=album,
//! and /albums/{id} for the full record with tracks.

use serde::{Deserialize, Serialize};

/// Client-credentials token response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// /search?type=album response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumSearchResponse {
    pub albums: AlbumPage,
}

/// Paged album list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumPage {
    #[serde(default)]
    pub items: Vec<AlbumSummary>,
    pub total: Option<u64>,
}

/// One album search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
}

/// /albums/{id} response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlbumDetails {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub total_tracks: Option<i64>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub artists: Vec<ArtistDto>,
    pub tracks: TrackPage,
}

/// Cover image
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Artist reference on an album
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistDto {
    pub id: String,
    pub name: String,
}

/// Paged track list on an album record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<TrackDto>,
}

/// One track on an album
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackDto {
    pub id: String,
    pub name: String,
    pub track_number: Option<i64>,
    pub duration_ms: Option<i64>,
}

/// Spotify error body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_album_details() {
        let json = r#"{
            "id": "7D2NdGvBHIavgLhmcwhluK",
            "name": "Low",
            "release_date": "1977-01-14",
            "total_tracks": 11,
            "images": [{"url": "https://i.scdn.co/image/low", "width": 640, "height": 640}],
            "artists": [{"id": "0oSGxfWSnnOXhD2fKuz2Gy", "name": "David Bowie"}],
            "tracks": {"items": [
                {"id": "t1", "name": "Speed of Life", "track_number": 1, "duration_ms": 166000},
                {"id": "t2", "name": "Breaking Glass", "track_number": 2, "duration_ms": 112000}
            ]}
        }"#;
        let album: AlbumDetails = serde_json::from_str(json).unwrap();
        assert_eq!(album.name, "Low");
        assert_eq!(album.tracks.items.len(), 2);
        assert_eq!(album.artists[0].name, "David Bowie");
    }

    #[test]
    fn test_decode_empty_search() {
        let json = r#"{"albums": {"items": [], "total": 0}}"#;
        let resp: AlbumSearchResponse = serde_json::from_str(json).unwrap();
        assert!(resp.albums.items.is_empty());
    }
}
