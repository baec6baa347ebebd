// ABOUTME: Tests for LLM provider selection used by the AI-assisted composer
// ABOUTME: Covers disabled mode, missing credentials and model overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use vitta_diet::config::LlmProviderType;
use vitta_diet::errors::ErrorCode;
use vitta_diet::llm::{ChatMessage, ChatProvider, ChatRequest, LlmProvider, MessageRole};

#[test]
fn test_request_builder() {
    let request = ChatRequest::new(vec![
        ChatMessage::system("rules"),
        ChatMessage::user("plan"),
    ])
    .with_model("llama-3.3-70b-versatile")
    .with_temperature(0.7)
    .with_max_tokens(2048);

    assert_eq!(request.messages[0].role, MessageRole::System);
    assert_eq!(request.messages[1].role.as_str(), "user");
    assert_eq!(request.model.as_deref(), Some("llama-3.3-70b-versatile"));
    assert_eq!(request.max_tokens, Some(2048));
}

#[test]
fn test_disabled_provider_yields_none() {
    let provider = ChatProvider::from_config(LlmProviderType::Disabled, None).unwrap();
    assert!(provider.is_none());
}

#[test]
#[serial]
fn test_groq_requires_api_key() {
    env::remove_var("GROQ_API_KEY");

    let err = ChatProvider::from_config(LlmProviderType::Groq, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
}

#[test]
#[serial]
fn test_groq_model_override() {
    env::set_var("GROQ_API_KEY", "gsk_test");

    let provider =
        ChatProvider::from_config(LlmProviderType::Groq, Some("llama-3.1-8b-instant".into()))
            .unwrap()
            .unwrap();
    env::remove_var("GROQ_API_KEY");

    assert_eq!(provider.name(), "groq");
    assert_eq!(provider.provider_type(), LlmProviderType::Groq);
    assert_eq!(provider.default_model(), "llama-3.1-8b-instant");
}

#[test]
#[serial]
fn test_local_provider_reads_model_from_environment() {
    env::set_var("LOCAL_LLM_BASE_URL", "http://127.0.0.1:9/v1");
    env::set_var("LOCAL_LLM_MODEL", "llama3.1:8b");

    let provider = ChatProvider::from_config(LlmProviderType::Local, None)
        .unwrap()
        .unwrap();
    env::remove_var("LOCAL_LLM_BASE_URL");
    env::remove_var("LOCAL_LLM_MODEL");

    assert_eq!(provider.provider_type(), LlmProviderType::Local);
    assert_eq!(provider.default_model(), "llama3.1:8b");
}
