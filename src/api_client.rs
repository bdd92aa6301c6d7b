//! Blocking HTTP client for the TMDB v3 API
//!
//! Requests are plain GETs of `{base_url}{path}?api_key={key}`. The client
//! returns raw response bodies; decoding is left to the [`metadata`](crate::metadata)
//! types. There is no retry and no caching: every call is one round-trip.

use crate::config::ApiConfig;
use crate::metadata::{DeserializationError, Episode, Show};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while talking to the API.
///
/// URLs carried by these errors never contain the API key.
#[derive(Debug, Error)]
pub enum ApiRequestError {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection or protocol failure
    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    /// No response within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body could not be read as text
    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Failure of a fetch-and-decode call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] ApiRequestError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),
}

/// Client for the metadata API.
pub struct ApiClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client using the configured timeout for every request.
    pub fn new(config: ApiConfig) -> Result<Self, ApiRequestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiRequestError::ClientBuild)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built with
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches `{resource_path}/{id}`, e.g. `get("tv", 1396)`.
    pub fn get(&self, resource_path: &str, id: impl Display) -> Result<String, ApiRequestError> {
        self.get_path(&format!("{}/{}", resource_path.trim_end_matches('/'), id))
    }

    /// Fetches an already assembled resource path such as
    /// `tv/1399/season/5/episode/1/credits`.
    pub fn get_path(&self, path: &str) -> Result<String, ApiRequestError> {
        let url = self.url_for(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ApiRequestError::Timeout { url: url.clone() }
                } else {
                    ApiRequestError::Request {
                        url: url.clone(),
                        source: e.without_url(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text() {
                Ok(body) => body,
                Err(e) => {
                    debug!(%url, error = %e.without_url(), "failed to read error body");
                    String::from("<unreadable body>")
                }
            };
            warn!(%url, status = status.as_u16(), "request rejected");
            return Err(ApiRequestError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                ApiRequestError::Timeout { url: url.clone() }
            } else {
                ApiRequestError::Body {
                    url: url.clone(),
                    source: e.without_url(),
                }
            }
        })?;

        debug!(%url, status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }

    /// Builds the request URL for a resource path, without the key.
    ///
    /// Exactly one `/` separates the base URL and the path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Fetches and decodes `tv/{show_id}`.
    pub fn fetch_show(&self, show_id: u64) -> Result<Show, FetchError> {
        let body = self.get("tv", show_id)?;
        Ok(Show::from_json(&body)?)
    }

    /// Fetches and decodes the credits of a single episode.
    pub fn fetch_episode_credits(
        &self,
        show_id: u64,
        season_number: u32,
        episode_number: u32,
    ) -> Result<Episode, FetchError> {
        let body = self.get_path(&credits_path(show_id, season_number, episode_number))?;
        Ok(Episode::from_json(&body)?)
    }
}

/// Resource path of an episode's credits
pub fn credits_path(show_id: u64, season_number: u32, episode_number: u32) -> String {
    format!(
        "tv/{}/season/{}/episode/{}/credits",
        show_id, season_number, episode_number
    )
}
