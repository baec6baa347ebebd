// ABOUTME: Core data models for the diet engine
// ABOUTME: Re-exports food, plan, profile and shopping list types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Shared data structures for the diet engine. The algorithm crate builds
//! [`DailyPlan`] values from a [`UserDietProfile`]; the store persists them as
//! [`DietSnapshot`] trees and derives [`ShoppingList`] projections from them.
//!
//! ## Core Models
//!
//! - `FoodItem`: Static catalog entry with per-reference nutrition
//! - `Quantity`: Numeric amount plus unit, rendered as `"150g"` or `"2 unidade(s)"`
//! - `DailyPlan`: Four meals composed for one day
//! - `DietSnapshot`: Persisted plan with its calorie and macro payload
//! - `UserDietProfile`: Per-call view over the user and preference records

// Domain modules
mod diet;
mod food;
mod profile;
mod shopping;

// Food domain
pub use food::{
    fold_text, format_amount, FoodCategory, FoodFamily, FoodItem, NutritionFacts, Quantity,
    QuantityUnit, ServingUnit,
};

// Plan domain
pub use diet::{
    DailyPlan, DietSnapshot, EnergyTargets, MacroPayload, MealSlot, NewSnapshot, PlanItem,
    PlanMeal, PlanOrigin, SnapshotItem, SnapshotMeal,
};

// Profile domain
pub use profile::{
    BiologicalSex, FoodPreferences, PreferencesRecord, UserDietProfile, UserRecord,
    WorkoutDuration, WorkoutFrequency,
};

// Shopping domain
pub use shopping::{ShoppingLine, ShoppingList, ShoppingListDraft, ShoppingPeriod};
