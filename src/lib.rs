// ABOUTME: Main library entry point for the Vitta diet engine
// ABOUTME: Wires configuration, logging, persistence, LLM providers and the generation services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Vitta Diet Engine
//!
//! Produces personalized daily meal plans. Calorie and macro targets come
//! from a Harris-Benedict energy model; meals come from an LLM when one is
//! configured and from a rule-based composer otherwise. Every accepted plan
//! is stored as the user's single active snapshot together with weekly and
//! monthly shopping lists.
//!
//! ## Architecture
//!
//! - **`vitta-core`**: errors, constants and domain models
//! - **`vitta-intelligence`**: pure algorithms (energy, portions, composer, validator)
//! - **Database**: `SQLite` stores behind repository traits
//! - **LLM**: chat-completion providers for the AI-assisted composer
//! - **Services**: the generation orchestrator and shopping list service
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vitta_diet::config::DietEngineConfig;
//! use vitta_diet::database::Database;
//! use vitta_diet::errors::AppResult;
//! use vitta_diet::services::DietGenerationService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = DietEngineConfig::from_env()?;
//!     let database = Database::new(&config.database.to_connection_string()).await?;
//!     let service = DietGenerationService::from_database(&database, &config, None);
//!
//!     let user_id = uuid::Uuid::new_v4();
//!     let snapshot = service.generate_diet_for_user(user_id).await?;
//!     println!("{} kcal/day", snapshot.daily_calories);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// `SQLite` persistence and repository traits
pub mod database;

/// Unified error handling
pub mod errors;

/// Chat-completion providers backing the AI-assisted composer
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Generation orchestrator, AI composer and shopping list services
pub mod services;

pub use vitta_core::{constants, models};

/// Pure diet algorithms, re-exported from `vitta-intelligence`
pub use vitta_intelligence as intelligence;
