// ABOUTME: Environment configuration for the diet engine - store location, LLM selection, retry policy
// ABOUTME: Parses environment variables into strongly typed settings with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

use crate::constants::generation::DEFAULT_MAX_ATTEMPTS;

/// Default store location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/vitta.db";

/// LLM provider selection for the AI-assisted composer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Groq cloud inference (default)
    #[default]
    Groq,
    /// Local `OpenAI`-compatible endpoint (Ollama, vLLM, `LocalAI`)
    Local,
    /// No AI composer; rule-based plans only
    Disabled,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "VITTA_LLM_PROVIDER";

    /// Environment variable for model override
    pub const MODEL_ENV_VAR: &'static str = "VITTA_LLM_MODEL";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            "none" | "disabled" | "off" => Self::Disabled,
            _ => Self::Groq,
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Model override from `VITTA_LLM_MODEL`, if set and non-empty
    #[must_use]
    pub fn model_from_env() -> Option<String> {
        env::var(Self::MODEL_ENV_VAR)
            .ok()
            .filter(|model| !model.trim().is_empty())
    }
}

impl fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::Local => write!(f, "local"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite {
        /// Database file
        path: PathBuf,
    },
    /// In-memory SQLite (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL or bare file path
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        let path_str = s.strip_prefix("sqlite://").or_else(|| s.strip_prefix("sqlite:"));
        match path_str.unwrap_or(s) {
            ":memory:" => Self::Memory,
            path => Self::SQLite {
                path: PathBuf::from(path),
            },
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(DEFAULT_DATABASE_URL)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Settings for diet generation runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietEngineConfig {
    /// Store location
    pub database: DatabaseUrl,
    /// Which LLM backs the AI-assisted composer
    pub llm_provider: LlmProviderType,
    /// Model override for the selected provider
    pub llm_model: Option<String>,
    /// Rule-based attempts before accepting a best-effort plan
    pub max_attempts: u32,
    /// Run the validator on AI-generated plans too
    pub validate_ai_plans: bool,
    /// Fixed seed for the composer's random choices
    pub seed: Option<u64>,
}

impl Default for DietEngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseUrl::default(),
            llm_provider: LlmProviderType::default(),
            llm_model: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            validate_ai_plans: true,
            seed: None,
        }
    }
}

impl DietEngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        let config = Self {
            database: DatabaseUrl::parse_url(&env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL)),
            llm_provider: LlmProviderType::from_env(),
            llm_model: LlmProviderType::model_from_env(),
            max_attempts: env_var_or("VITTA_DIET_MAX_ATTEMPTS", &DEFAULT_MAX_ATTEMPTS.to_string())
                .parse::<u32>()
                .context("Invalid VITTA_DIET_MAX_ATTEMPTS value")?
                .max(1),
            validate_ai_plans: parse_bool(&env_var_or("VITTA_DIET_VALIDATE_AI", "true"))
                .context("Invalid VITTA_DIET_VALIDATE_AI value")?,
            seed: env::var("VITTA_DIET_SEED")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().parse::<u64>())
                .transpose()
                .context("Invalid VITTA_DIET_SEED value")?,
        };

        info!("{}", config.summary());
        Ok(config)
    }

    /// Human-readable summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Vitta diet engine configuration: database={}, llm={}{}, max_attempts={}, validate_ai={}, seeded={}",
            self.database,
            self.llm_provider,
            self.llm_model
                .as_deref()
                .map(|model| format!(" ({model})"))
                .unwrap_or_default(),
            self.max_attempts,
            self.validate_ai_plans,
            self.seed.is_some()
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{other}'")),
    }
}
