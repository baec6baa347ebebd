// ABOUTME: Core types and constants for the Vitta diet engine
// ABOUTME: Foundation crate with error handling, diet constants, and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Vitta Core
//!
//! Foundation crate providing shared types and constants for the Vitta diet
//! engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Energy model coefficients and composition rules
//! - **models**: Foods, quantities, plans, snapshots, profiles and shopping lists

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`FoodItem`, `Quantity`, `DailyPlan`, `DietSnapshot`, etc.)
pub mod models;
