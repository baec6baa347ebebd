// ABOUTME: Re-export of the unified error types from vitta-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable for the engine's modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling, defined in `vitta-core` so the algorithm crate
//! and the engine share one error type.

pub use vitta_core::errors::*;
