use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{DEFAULT_RESPONSE_ERROR, USER_AGENT};
use crate::feed::model::{PostList, PostListResponse};

/// Why a fetch of the posts endpoint did not produce a post list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete.
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The body was not the expected JSON document.
    #[error("invalid response body: {0}")]
    Parse(#[source] serde_json::Error),
    /// The upstream answered but reported a failure.
    #[error("{0}")]
    Response(String),
}

/// HTTP client for the upstream posts endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    posts_url: String,
}

impl FeedClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            posts_url: config.posts_url(),
        })
    }

    #[must_use]
    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }

    /// Fetch and validate the current post list.
    ///
    /// The HTTP status is not checked on its own: the upstream reports
    /// failures in the JSON body, which is what decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the body is not JSON of
    /// the expected shape, or the upstream status is not `"success"`.
    pub async fn fetch_posts(&self) -> Result<PostList, FetchError> {
        let response = self
            .client
            .get(&self.posts_url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let http_status = response.status();
        let body = response.bytes().await.map_err(FetchError::Network)?;
        debug!(status = %http_status, bytes = body.len(), "Fetched posts");

        let parsed = parse_envelope(&body)?;
        if !http_status.is_success() {
            warn!(status = %http_status, "Upstream answered with a non-success HTTP status");
        }
        Ok(parsed)
    }
}

/// Validate a raw response body into a post list.
///
/// The status is checked before the post list is decoded, so a failed
/// envelope with a malformed `posts` field still reports its own error.
///
/// # Errors
///
/// See [`FeedClient::fetch_posts`].
pub fn parse_envelope(body: &[u8]) -> Result<PostList, FetchError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(FetchError::Parse)?;

    let status = value.get("status").and_then(serde_json::Value::as_str);
    if status != Some(PostListResponse::SUCCESS) {
        let message = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_RESPONSE_ERROR);
        return Err(FetchError::Response(message.to_string()));
    }

    let response: PostListResponse = serde_json::from_value(value).map_err(FetchError::Parse)?;
    Ok(PostList {
        posts: response.posts,
        count: response.count,
        last_update: response.last_update,
    })
}
