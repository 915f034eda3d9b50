//! Spotify HTTP client
//!
//! Handles communication with the Spotify Web API for album lookups.
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Uses the client-credentials flow: a short-lived bearer token is fetched
//! on demand and cached until shortly before expiry. Credentials are held
//! in the client and never logged.

use std::path::Path;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichedAlbum, EnrichmentError, Lookup};
use crate::enrichment::naming;

/// Per-request timeout so one hung call cannot stall a sync pass.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Refresh the token this long before Spotify's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!(
    "MediaMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/media-minder)"
);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Spotify API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    /// Create a new client with the given credentials
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://api.spotify.com/v1".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        }
    }

    /// Create a client for testing with custom API and token URLs
    #[cfg(test)]
    pub fn with_base_urls(
        base_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            token_url: token_url.into(),
            client_id: "test-id".to_string(),
            client_secret: "test-secret".to_string(),
            token: Mutex::new(None),
        }
    }

    /// Look up the album a song file belongs to.
    ///
    /// An album hit whose track list cannot be matched to the file resolves
    /// to NotFound: upserting an album with no song carrying this fs_path
    /// would leave the path eligible for insert on every pass.
    pub async fn find_album(
        &self,
        path: &Path,
    ) -> Result<Lookup<EnrichedAlbum>, EnrichmentError> {
        let Some(query) = naming::album_query(path) else {
            return Ok(Lookup::NotFound);
        };

        let search = self.search_album(&query).await?;
        let Some(hit) = search.albums.items.first() else {
            return Ok(Lookup::NotFound);
        };

        let details = self.album_details(&hit.id).await?;
        match adapter::to_enriched_album(details, &query, &path.to_string_lossy()) {
            Some(album) => Ok(Lookup::Found(album)),
            None => Ok(Lookup::NotFound),
        }
    }

    async fn search_album(
        &self,
        query: &naming::AlbumQuery,
    ) -> Result<dto::AlbumSearchResponse, EnrichmentError> {
        let mut q = format!("album:{}", query.album);
        if let Some(artist) = &query.artist {
            q.push_str(&format!(" artist:{artist}"));
        }
        let url = format!(
            "{}/search?type=album&limit=5&q={}",
            self.base_url,
            urlencoding::encode(&q)
        );
        self.get_json(&url).await
    }

    async fn album_details(&self, id: &str) -> Result<dto::AlbumDetails, EnrichmentError> {
        let url = format!("{}/albums/{}", self.base_url, id);
        self.get_json(&url).await
    }

    /// Fetch or reuse the client-credentials bearer token.
    async fn bearer_token(&self) -> Result<String, EnrichmentError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::BAD_REQUEST
        {
            return Err(EnrichmentError::Auth(
                "invalid Spotify client credentials".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(EnrichmentError::Network(format!(
                "token request failed: HTTP {}",
                response.status()
            )));
        }

        let token: dto::TokenResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// Send an authenticated GET and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, EnrichmentError> {
        let token = self.bearer_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Token may have been revoked; drop the cache so the next call
            // fetches a fresh one.
            self.token.lock().await.take();
            return Err(EnrichmentError::Auth("Spotify token rejected".to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::Api(error.error.message));
            }
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}
