// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Asset validation: configuration, rule engine and result types

pub mod config;
pub mod engine;
pub mod types;
pub mod uv;

pub use config::{ConfigError, ConfigFormat, ValidationConfig};
pub use engine::{calculate_statistics, validate, Validator};
pub use types::{
    IssueSummary, MaterialValidationResult, MeshValidationResult, Severity, Statistics,
    ValidationIssue, ValidationResult,
};
