// ABOUTME: Generic OpenAI-compatible LLM provider for local and self-hosted endpoints
// ABOUTME: Supports Ollama, vLLM, LocalAI, and any OpenAI-compatible chat completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Provider
//!
//! ## Configuration
//!
//! - `LOCAL_LLM_BASE_URL`: Base URL (default: <http://localhost:11434/v1> for Ollama)
//! - `LOCAL_LLM_MODEL`: Model to use (default: `qwen2.5:14b-instruct`)
//! - `LOCAL_LLM_API_KEY`: API key (optional, empty for local servers)
//!
//! ## Supported Backends
//!
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **`LocalAI`**: <http://localhost:8080/v1>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for local LLM base URL
const LOCAL_LLM_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";

/// Environment variable for local LLM model
const LOCAL_LLM_MODEL_ENV: &str = "LOCAL_LLM_MODEL";

/// Environment variable for local LLM API key (optional)
const LOCAL_LLM_API_KEY_ENV: &str = "LOCAL_LLM_API_KEY";

/// Default base URL (Ollama)
const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
const DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

/// Connection timeout for local servers (more lenient than cloud)
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Request timeout (local inference can be slower)
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: &'static str,
}

impl OpenAiCompatibleConfig {
    /// Read the configuration from `LOCAL_LLM_*` variables
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var(LOCAL_LLM_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let default_model =
            env::var(LOCAL_LLM_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        let api_key = env::var(LOCAL_LLM_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty());

        Self {
            provider_name: Self::detect_provider_name(&base_url),
            base_url,
            api_key,
            default_model,
        }
    }

    /// Guess the backend from its conventional port
    fn detect_provider_name(base_url: &str) -> &'static str {
        if base_url.contains(":11434") {
            "ollama"
        } else if base_url.contains(":8000") {
            "vllm"
        } else if base_url.contains(":8080") {
            "localai"
        } else {
            "local"
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            provider_name: "local",
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_env() -> Result<Self, AppError> {
        let config = OpenAiCompatibleConfig::from_env();

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.provider_name, config.base_url, config.default_model
        );

        Self::new(config)
    }

    /// Override the model used when a request names none
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            // Local servers often answer with plain text or an HTML proxy page
            return match status.as_u16() {
                502..=504 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    "Local LLM server is not responding. Is Ollama/vLLM running?",
                ),
                _ => AppError::external_service(
                    "LocalLLM",
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            };
        };

        let message = error_response.error.message;
        match status.as_u16() {
            401 => AppError::external_auth_failed("LocalLLM", message),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("LLM rate limit reached: {message}"),
            ),
            400 => AppError::invalid_input(format!("API validation error: {message}")),
            404 => AppError::not_found(format!("Model or endpoint ({message})")),
            503 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("Service unavailable (is the local server running?): {message}"),
            ),
            _ => AppError::external_service(
                "LocalLLM",
                format!(
                    "{} - {message}",
                    error_response
                        .error
                        .error_type
                        .as_deref()
                        .unwrap_or("unknown")
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        debug!(
            "Sending chat completion request with {} messages",
            request.messages.len()
        );

        let api_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach {}: {}", self.config.base_url, e);
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("LocalLLM: failed to connect to {}: {e}", self.config.base_url),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("LocalLLM", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let api_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service("LocalLLM", format!("Failed to parse response: {e}"))
        })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("LocalLLM", "API returned no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: api_response.model,
            usage: api_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_from_port() {
        assert_eq!(
            OpenAiCompatibleConfig::detect_provider_name("http://localhost:11434/v1"),
            "ollama"
        );
        assert_eq!(
            OpenAiCompatibleConfig::detect_provider_name("http://gpu-box:8000/v1"),
            "vllm"
        );
        assert_eq!(
            OpenAiCompatibleConfig::detect_provider_name("https://llm.internal/v1"),
            "local"
        );
    }

    #[test]
    fn test_plain_text_gateway_errors_mean_unavailable() {
        let err = OpenAiCompatibleProvider::parse_error_response(
            reqwest::StatusCode::BAD_GATEWAY,
            "Bad Gateway",
        );
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let config = OpenAiCompatibleConfig {
            base_url: "http://localhost:11434/v1/".to_owned(),
            ..OpenAiCompatibleConfig::default()
        };
        let provider = OpenAiCompatibleProvider::new(config).unwrap();
        assert_eq!(
            provider.api_url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
