// ABOUTME: Configuration module for the diet engine
// ABOUTME: Re-exports environment-driven settings for storage, LLM selection and generation policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the Vitta diet engine
//!
//! All settings come from environment variables; see [`environment`].

/// Environment variable parsing
pub mod environment;

pub use environment::{DatabaseUrl, DietEngineConfig, LlmProviderType, DEFAULT_DATABASE_URL};
