//! Messages API client for the research/extraction service.
//!
//! Sends one user prompt with the web search tool enabled and returns the
//! concatenated text blocks of the reply. A refusal the service answers with
//! its own JSON error envelope (rate limit, overload) carries no text blocks
//! and comes back as an empty reply. Transport failures and bodies that are
//! not a Messages envelope at all are [`AcquisitionError`]s.

use crate::circuit_breaker::{ApiCircuitBreaker, ApiCircuitBreakerConfig};
use crate::error::AcquisitionError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";
const PROVIDER: &str = "anthropic";

/// Error bodies are truncated to this many characters in error messages
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
    tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Only text blocks matter; tool-use and search-result blocks are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A decoded reply, split by whether the service accepted the request.
#[derive(Debug)]
enum Reply {
    Accepted(String),
    Refused { status: u16, text: String },
}

#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
    circuit_breaker: Arc<ApiCircuitBreaker>,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("circuit_breaker_state", &self.circuit_breaker.state())
            .finish()
    }
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self::with_breaker(config, ApiCircuitBreakerConfig::default())
    }

    pub fn with_breaker(config: AnthropicConfig, breaker: ApiCircuitBreakerConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
            circuit_breaker: Arc::new(ApiCircuitBreaker::new(PROVIDER, breaker)),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run one research prompt and return the reply text (possibly empty).
    ///
    /// Refused requests count against the circuit breaker. While it is open
    /// no request is sent and the reply is empty.
    pub async fn research(&self, prompt: &str, max_tokens: u32) -> Result<String, AcquisitionError> {
        if !self.circuit_breaker.is_available() {
            warn!("{} circuit open, request withheld", PROVIDER);
            return Ok(String::new());
        }

        match self.send(prompt, max_tokens).await {
            Ok(Reply::Accepted(text)) => {
                self.circuit_breaker.record_success();
                Ok(text)
            }
            Ok(Reply::Refused { status, text }) => {
                warn!("{} refused request with HTTP {}", PROVIDER, status);
                self.circuit_breaker.record_failure();
                Ok(text)
            }
            Err(e) => {
                self.circuit_breaker.record_failure();
                Err(e)
            }
        }
    }

    async fn send(&self, prompt: &str, max_tokens: u32) -> Result<Reply, AcquisitionError> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            tools: vec![ToolSpec {
                kind: WEB_SEARCH_TOOL,
                name: "web_search",
            }],
        };

        debug!("POST {} (model={}, max_tokens={})", url, self.config.model, max_tokens);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AcquisitionError::transport(PROVIDER, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| AcquisitionError::transport(PROVIDER, e.to_string()))?;
            return match serde_json::from_str::<MessagesResponse>(&body) {
                Ok(parsed) => Ok(Reply::Refused {
                    status: status.as_u16(),
                    text: parsed.text(),
                }),
                Err(_) => Err(AcquisitionError::HttpStatus {
                    provider: PROVIDER.to_string(),
                    status: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY).collect(),
                }),
            };
        }

        let parsed: MessagesResponse =
            resp.json()
                .await
                .map_err(|e| AcquisitionError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Reply::Accepted(parsed.text()))
    }
}
