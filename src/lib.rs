// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Asset Validator
//!
//! Rule-based validation for 3-D scene assets. A loaded scene (meshes,
//! materials, textures) is checked against a configurable set of geometry,
//! UV, naming, material and texture rules, and the findings are rendered as
//! JSON, HTML or console reports.

pub mod io;
pub mod report;
pub mod scene;
pub mod validation;

pub use io::{load_gltf, LoadError};
pub use report::{ReportError, ReportFormat, ReportOptions, Reporter};
pub use scene::{MaterialRecord, MeshRecord, SceneError, SceneModel, TextureRecord, TextureSlot};
pub use validation::{
    validate, ConfigError, Severity, ValidationConfig, ValidationIssue, ValidationResult, Validator,
};

use anyhow::Result;
use std::path::Path;

/// Load a glTF/GLB file and validate it under `config`
pub fn validate_file(path: impl AsRef<Path>, config: &ValidationConfig) -> Result<ValidationResult> {
    let scene = load_gltf(path)?;
    Ok(validate(&scene, config)?)
}
