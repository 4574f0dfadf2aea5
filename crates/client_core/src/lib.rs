use std::time::Duration;

use async_trait::async_trait;
use pdf_export::{ImageError, ImageFetcher};
use reqwest::Client;
use shared::{
    domain::{Story, StoryRequest},
    error::ApiErrorBody,
    protocol::{GenerateStoryRequest, GenerateStoryResponse, GENERATE_STORY_PATH},
};
use tracing::{debug, error, info};
use url::Url;

pub mod error;
pub mod form;
pub mod render;
pub mod settings;

pub use error::ClientError;
pub use form::{FormController, FormError, Notice, StoryGenerator, SubmitOutcome};
pub use render::{render_blocks, ImageSide, StoryBlock};
pub use settings::{load_settings, normalize_base_url, ClientSettings};

/// HTTP client for the story-generation service.
#[derive(Debug, Clone)]
pub struct StoryClient {
    http: Client,
    base_url: String,
}

impl StoryClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::with_timeout(&settings.api_base_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Image fetcher sharing this client's connection pool.
    pub fn image_fetcher(&self) -> HttpImageFetcher {
        HttpImageFetcher {
            http: self.http.clone(),
        }
    }

    pub async fn generate_story(&self, request: &StoryRequest) -> Result<Story, ClientError> {
        let url = format!("{}{GENERATE_STORY_PATH}", self.base_url);
        info!(
            character = %request.character,
            setting = %request.setting,
            goal = %request.goal,
            "requesting story"
        );

        let response = self
            .http
            .post(&url)
            .json(&GenerateStoryRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|body| body.detail_message());
            error!(status = status.as_u16(), detail = ?detail, "story service rejected request");
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await?;
        let parsed: GenerateStoryResponse = serde_json::from_slice(&body)
            .map_err(|err| ClientError::MalformedResponse(err.to_string()))?;
        debug!(parts = parsed.story.len(), "story response parsed");
        Ok(parsed.into())
    }
}

#[async_trait]
impl StoryGenerator for StoryClient {
    async fn generate_story(&self, request: &StoryRequest) -> Result<Story, ClientError> {
        StoryClient::generate_story(self, request).await
    }
}

/// Fetches story images over HTTP for display and export.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    http: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let fetch_error = |reason: String| ImageError::Fetch {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|err| fetch_error(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(fetch_error(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let response = self
            .http
            .get(parsed)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| fetch_error(err.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;
        debug!(url, bytes = bytes.len(), "fetched story image");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
