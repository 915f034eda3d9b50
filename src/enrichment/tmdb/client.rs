//! TMDB HTTP client
//!
//! Handles communication with the TMDB v3 API for movie and TV lookups.
//! See: https://developer.themoviedb.org/reference
//!
//! Lookups are two-step: a text search resolves the filename to an id, then
//! a details request (with credits and similar appended) fetches the full
//! record. An empty search result is a NotFound outcome, not an error.

use std::path::Path;
use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichedMovie, EnrichedTvShow, EnrichmentError, Lookup};
use crate::enrichment::naming;

/// Per-request timeout so one hung call cannot stall a sync pass.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(
    "MediaMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/media-minder)"
);

/// TMDB API client
pub struct TmdbClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Look up the movie a file belongs to.
    pub async fn find_movie(
        &self,
        path: &Path,
    ) -> Result<Lookup<EnrichedMovie>, EnrichmentError> {
        let Some(query) = naming::movie_query(path) else {
            return Ok(Lookup::NotFound);
        };

        let search = self.search_movie(&query.title, query.year).await?;
        let Some(hit) = search.results.first() else {
            return Ok(Lookup::NotFound);
        };

        let details = self.movie_details(hit.id).await?;
        Ok(Lookup::Found(adapter::to_enriched_movie(
            details,
            path.to_string_lossy().into_owned(),
        )))
    }

    /// Look up the show (with the matched season's episodes) an episode
    /// file belongs to. Files without a recognizable episode marker are
    /// NotFound.
    pub async fn find_show(
        &self,
        path: &Path,
    ) -> Result<Lookup<EnrichedTvShow>, EnrichmentError> {
        let Some(query) = naming::episode_query(path) else {
            return Ok(Lookup::NotFound);
        };

        let search = self.search_tv(&query.show).await?;
        let Some(hit) = search.results.first() else {
            return Ok(Lookup::NotFound);
        };

        let details = self.tv_details(hit.id).await?;
        let Some(summary) = details
            .seasons
            .iter()
            .find(|s| s.season_number == query.season)
        else {
            return Ok(Lookup::NotFound);
        };

        let season = self.season_details(hit.id, summary.season_number).await?;
        let Some(show) = adapter::to_enriched_show(
            details,
            season,
            query.episode,
            path.to_string_lossy().into_owned(),
        ) else {
            // Season exists but the episode number doesn't
            return Ok(Lookup::NotFound);
        };

        Ok(Lookup::Found(show))
    }

    async fn search_movie(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<dto::MovieSearchResponse, EnrichmentError> {
        let mut url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(title)
        );
        if let Some(year) = year {
            url.push_str(&format!("&year={year}"));
        }
        self.get_json(&url).await
    }

    async fn search_tv(&self, name: &str) -> Result<dto::TvSearchResponse, EnrichmentError> {
        let url = format!(
            "{}/search/tv?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(name)
        );
        self.get_json(&url).await
    }

    async fn movie_details(&self, id: i64) -> Result<dto::MovieDetails, EnrichmentError> {
        let url = format!(
            "{}/movie/{}?api_key={}&append_to_response=credits,similar",
            self.base_url, id, self.api_key
        );
        self.get_json(&url).await
    }

    async fn tv_details(&self, id: i64) -> Result<dto::TvDetails, EnrichmentError> {
        let url = format!(
            "{}/tv/{}?api_key={}&append_to_response=credits,similar",
            self.base_url, id, self.api_key
        );
        self.get_json(&url).await
    }

    async fn season_details(
        &self,
        show_id: i64,
        season_number: i64,
    ) -> Result<dto::SeasonDetails, EnrichmentError> {
        let url = format!(
            "{}/tv/{}/season/{}?api_key={}",
            self.base_url, show_id, season_number, self.api_key
        );
        self.get_json(&url).await
    }

    /// Send a GET and decode the JSON body, mapping TMDB status codes onto
    /// the enrichment error taxonomy.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, EnrichmentError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(EnrichmentError::Auth("invalid TMDB API key".to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::Api(error.status_message));
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
