// Anthropic Messages API client
//
// *O Interlocutor* (The Interlocutor) - Sends the assembled prompt as a single
// user message and returns the first text block of the reply

use crate::backend::ChatBackend;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Messages API endpoint
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-opus-4-1-20250805";

/// API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Default reply size cap
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);

/// Client settings
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Endpoint URL
    pub api_url: String,

    /// Reply size cap
    pub max_tokens: u32,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Defaults around an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// First non-empty text block of a Messages API response body, trimmed
pub fn extract_text(body: &str) -> Result<String> {
    let response: MessagesResponse =
        serde_json::from_str(body).map_err(|_| Error::EmptyResponse)?;
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or(Error::EmptyResponse)
}

/// [`ChatBackend`] backed by the Anthropic Messages API
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    config: AnthropicConfig,
    http: reqwest::Client,
}

impl AnthropicClient {
    /// Build a client; fails without an API key
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ChatBackend for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Chat request: model={} prompt_len={}", self.config.model, prompt.len());
        let response = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Chat backend error: {}", status);
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
