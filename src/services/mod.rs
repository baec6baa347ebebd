// ABOUTME: Domain service layer - orchestration over the stores, the LLM and the algorithm crate
// ABOUTME: Services depend on repository traits so tests can swap in doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer

/// LLM-backed plan composition with lenient response parsing
pub mod ai_composer;

/// Diet generation orchestrator
pub mod diet_generation;

/// Shopping list regeneration for persisted snapshots
pub mod shopping_list;

pub use ai_composer::AiDietComposer;
pub use diet_generation::{
    DietGenerationService, GenerationOutcome, GenerationPath, GenerationPolicy,
};
pub use shopping_list::ShoppingListService;
