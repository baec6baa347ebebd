// ABOUTME: Unified LLM provider selector for runtime provider switching
// ABOUTME: Picks Groq or a local OpenAI-compatible server based on environment configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Selector
//!
//! Set the `VITTA_LLM_PROVIDER` environment variable:
//! - `groq` (default): Groq cloud inference, requires `GROQ_API_KEY`
//! - `local`/`ollama`/`vllm`: any `OpenAI`-compatible endpoint
//! - `none`/`disabled`: no AI composer, rule-based plans only

use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

use super::{ChatRequest, ChatResponse, GroqProvider, LlmProvider, OpenAiCompatibleProvider};
use crate::config::LlmProviderType;
use crate::errors::AppError;

/// Unified chat provider that wraps Groq or a local LLM
pub enum ChatProvider {
    /// Groq provider for fast, cost-effective inference
    Groq(GroqProvider),
    /// Local LLM provider via `OpenAI`-compatible API (Ollama, vLLM, `LocalAI`)
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create the provider selected by `VITTA_LLM_PROVIDER`
    ///
    /// Returns `Ok(None)` when the AI composer is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider is missing its API key
    /// or its HTTP client cannot be created.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        Self::from_config(LlmProviderType::from_env(), LlmProviderType::model_from_env())
    }

    /// Create a provider for an explicit type and optional model override
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn from_config(
        provider_type: LlmProviderType,
        model: Option<String>,
    ) -> Result<Option<Self>, AppError> {
        info!(
            "Initializing LLM provider: {} (set {} to change)",
            provider_type,
            LlmProviderType::ENV_VAR
        );

        let provider = match provider_type {
            LlmProviderType::Disabled => return Ok(None),
            LlmProviderType::Groq => {
                let groq = GroqProvider::from_env()?;
                Self::Groq(match model {
                    Some(model) => groq.with_default_model(model),
                    None => groq,
                })
            }
            LlmProviderType::Local => {
                let local = OpenAiCompatibleProvider::from_env()?;
                Self::Local(match model {
                    Some(model) => local.with_default_model(model),
                    None => local,
                })
            }
        };

        debug!(
            "Provider {} initialized with model: {}",
            provider.name(),
            provider.default_model()
        );
        Ok(Some(provider))
    }

    /// Get the provider type
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::Groq(_) => LlmProviderType::Groq,
            Self::Local(_) => LlmProviderType::Local,
        }
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groq(_) => f.debug_tuple("ChatProvider::Groq").finish(),
            Self::Local(_) => f.debug_tuple("ChatProvider::Local").finish(),
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::Groq(p) => p.name(),
            Self::Local(p) => p.name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::Groq(p) => p.default_model(),
            Self::Local(p) => p.default_model(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::Groq(p) => p.complete(request).await,
            Self::Local(p) => p.complete(request).await,
        }
    }
}
