// ABOUTME: Tests for environment-driven diet engine configuration
// ABOUTME: Covers provider selection, store URLs, retry policy and malformed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use vitta_diet::config::{DatabaseUrl, DietEngineConfig, LlmProviderType, DEFAULT_DATABASE_URL};
use vitta_diet::services::GenerationPolicy;

const VARS: [&str; 6] = [
    "DATABASE_URL",
    "VITTA_LLM_PROVIDER",
    "VITTA_LLM_MODEL",
    "VITTA_DIET_MAX_ATTEMPTS",
    "VITTA_DIET_VALIDATE_AI",
    "VITTA_DIET_SEED",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_provider_aliases() {
    assert_eq!(LlmProviderType::from_str_or_default("LOCAL"), LlmProviderType::Local);
    assert_eq!(LlmProviderType::from_str_or_default(" vllm "), LlmProviderType::Local);
    assert_eq!(LlmProviderType::from_str_or_default("off"), LlmProviderType::Disabled);
    assert_eq!(LlmProviderType::from_str_or_default(""), LlmProviderType::Groq);
    assert_eq!(LlmProviderType::Disabled.to_string(), "disabled");
}

#[test]
fn test_database_url_forms() {
    assert_eq!(DatabaseUrl::parse_url("sqlite://:memory:"), DatabaseUrl::Memory);
    assert_eq!(
        DatabaseUrl::parse_url("sqlite:///var/lib/vitta.db"),
        DatabaseUrl::SQLite {
            path: PathBuf::from("/var/lib/vitta.db")
        }
    );
    assert_eq!(DatabaseUrl::Memory.to_string(), "sqlite::memory:");
    assert_eq!(DatabaseUrl::default().to_connection_string(), DEFAULT_DATABASE_URL);
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = DietEngineConfig::from_env().unwrap();

    assert_eq!(config.database, DatabaseUrl::default());
    assert_eq!(config.llm_provider, LlmProviderType::Groq);
    assert_eq!(config.llm_model, None);
    assert_eq!(config.max_attempts, 3);
    assert!(config.validate_ai_plans);
    assert_eq!(config.seed, None);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("VITTA_LLM_PROVIDER", "ollama");
    env::set_var("VITTA_LLM_MODEL", "qwen2.5:14b");
    env::set_var("VITTA_DIET_MAX_ATTEMPTS", "5");
    env::set_var("VITTA_DIET_VALIDATE_AI", "no");
    env::set_var("VITTA_DIET_SEED", "1234");

    let config = DietEngineConfig::from_env().unwrap();
    clear_env();

    assert!(config.database.is_memory());
    assert_eq!(config.llm_provider, LlmProviderType::Local);
    assert_eq!(config.llm_model.as_deref(), Some("qwen2.5:14b"));
    assert_eq!(config.max_attempts, 5);
    assert!(!config.validate_ai_plans);
    assert_eq!(config.seed, Some(1234));
    assert!(config.summary().contains("llm=local (qwen2.5:14b)"));

    let policy = GenerationPolicy::from(&config);
    assert_eq!(policy.max_attempts, 5);
    assert!(!policy.validate_ai_plans);
    assert_eq!(policy.seed, Some(1234));
}

#[test]
#[serial]
fn test_zero_attempts_is_raised_to_one() {
    clear_env();
    env::set_var("VITTA_DIET_MAX_ATTEMPTS", "0");

    let config = DietEngineConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.max_attempts, 1);
}

#[test]
#[serial]
fn test_blank_model_and_seed_are_ignored() {
    clear_env();
    env::set_var("VITTA_LLM_MODEL", "   ");
    env::set_var("VITTA_DIET_SEED", "");

    let config = DietEngineConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.llm_model, None);
    assert_eq!(config.seed, None);
}

#[test]
#[serial]
fn test_malformed_values_are_rejected() {
    clear_env();
    env::set_var("VITTA_DIET_MAX_ATTEMPTS", "three");
    assert!(DietEngineConfig::from_env().is_err());

    clear_env();
    env::set_var("VITTA_DIET_VALIDATE_AI", "sometimes");
    assert!(DietEngineConfig::from_env().is_err());

    clear_env();
    env::set_var("VITTA_DIET_SEED", "-1");
    assert!(DietEngineConfig::from_env().is_err());

    clear_env();
}
