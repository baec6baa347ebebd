// ABOUTME: Tests for logging configuration defaults and environment parsing
// ABOUTME: Checks format selection and production defaults without installing a subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use vitta_diet::logging::{LogFormat, LoggingConfig};

#[test]
fn test_default_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.service_name, "vitta-diet");
    assert!(!config.include_location);
}

#[test]
#[serial]
fn test_production_environment_enables_location() {
    env::set_var("ENVIRONMENT", "production");
    env::set_var("LOG_FORMAT", "json");

    let config = LoggingConfig::from_env();
    env::remove_var("ENVIRONMENT");
    env::remove_var("LOG_FORMAT");

    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(config.include_thread);
    assert_eq!(config.environment, "production");
}

#[test]
#[serial]
fn test_compact_format() {
    env::set_var("LOG_FORMAT", "compact");
    let config = LoggingConfig::from_env();
    env::remove_var("LOG_FORMAT");

    assert_eq!(config.format, LogFormat::Compact);
}
