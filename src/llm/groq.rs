// ABOUTME: Groq LLM provider implementation for the AI-assisted meal composer
// ABOUTME: Uses the OpenAI-compatible chat completions API served by Groq
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Groq Provider
//!
//! Set the `GROQ_API_KEY` environment variable with your API key from
//! Groq Console: <https://console.groq.com/keys>

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::{AppError, ErrorCode};

/// Environment variable for Groq API key
const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Base URL for the Groq API (OpenAI-compatible)
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Whole-request timeout; a diet is a single non-streamed completion
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for GroqMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GroqErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Groq LLM provider
pub struct GroqProvider {
    client: Client,
    api_key: String,
    default_model: String,
}

impl GroqProvider {
    /// Create a new Groq provider with the given API key
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(api_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            default_model: DEFAULT_MODEL.to_owned(),
        })
    }

    /// Create a Groq provider from environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not set
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var(GROQ_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCode::ConfigMissing,
                    format!(
                        "Missing {GROQ_API_KEY_ENV} environment variable. Get your API key from https://console.groq.com/keys"
                    ),
                )
            })?;

        Self::new(api_key)
    }

    /// Override the model used when a request names none
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn api_url(endpoint: &str) -> String {
        format!("{API_BASE_URL}/{endpoint}")
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let Ok(error_response) = serde_json::from_str::<GroqErrorResponse>(body) else {
            return AppError::external_service(
                "Groq",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            );
        };

        let message = error_response.error.message;
        match status.as_u16() {
            401 => AppError::external_auth_failed("Groq", message),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("Groq rate limit exceeded: {message}"),
            ),
            400 => AppError::invalid_input(format!("Groq API validation error: {message}")),
            _ => AppError::external_service(
                "Groq",
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
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);

        debug!("Sending chat completion request to Groq");

        let groq_request = GroqRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(GroqMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(Self::api_url("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Groq API: {}", e);
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("Groq: failed to connect: {e}"),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("Groq", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let groq_response: GroqResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service("Groq", format!("Failed to parse response: {e}"))
        })?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("Groq", "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from Groq: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: groq_response.model,
            usage: groq_response.usage.map(|u| TokenUsage {
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
    fn test_error_mapping() {
        let body = r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#;
        let err = GroqProvider::parse_error_response(reqwest::StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.code, ErrorCode::ExternalAuthFailed);

        let err = GroqProvider::parse_error_response(reqwest::StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.code, ErrorCode::ExternalRateLimited);

        let err = GroqProvider::parse_error_response(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }
}
