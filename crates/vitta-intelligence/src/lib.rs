// ABOUTME: Diet intelligence algorithms for the Vitta diet engine
// ABOUTME: Food catalog, energy model, portions, meal composition, validation and shopping math
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Vitta Intelligence
//!
//! Pure computation with no I/O. The engine crate feeds these functions a
//! [`UserDietProfile`](vitta_core::models::UserDietProfile) and persists what
//! they return.
//!
//! ## Modules
//!
//! - **food_catalog**: Static reference foods and lookups
//! - **energy**: TMB, exercise burn, calorie target, macros and water
//! - **portion**: Calorie allotment to serving size
//! - **meal_composer**: Rule-based four-meal day
//! - **validator**: Composition and ratio rules for any plan
//! - **shopping**: Weekly and monthly aggregation

/// Static food catalog
pub mod food_catalog;

/// Energy model (Harris-Benedict)
pub mod energy;

/// Portion calculator
pub mod portion;

/// Rule-based meal composer
pub mod meal_composer;

/// Diet validator
pub mod validator;

/// Shopping list aggregation
pub mod shopping;

pub use energy::compute_energy_targets;
pub use meal_composer::compose_daily_plan;
pub use portion::{calculate_portion, Portion};
pub use validator::{is_valid_diet, validate_diet, ValidationReport, Violation};
