// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Validation result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::scene::serialize_path_lossy;

/// Issue severity. Ordered: `Info < Warning < Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Highest to lowest, the order reports group issues in
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Whether an issue of this severity fails validation
    pub fn is_failure(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Open classification tag, e.g. "geometry", "uv", "naming"
    pub category: String,
    pub message: String,
    /// Offending entity, e.g. a mesh name or "Scene"
    pub location: String,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            location: location.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Per-mesh result, echoing the mesh's statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshValidationResult {
    pub name: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub material_count: usize,
    #[serde(rename = "hasValidUVs")]
    pub has_valid_uvs: bool,
    pub issues: Vec<ValidationIssue>,
}

/// Per-material result with its texture references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialValidationResult {
    pub name: String,
    pub textures: Vec<String>,
    pub has_valid_textures: bool,
    pub issues: Vec<ValidationIssue>,
}

/// Aggregate counts, always recomputed from the scene's entity lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_vertices: usize,
    pub total_triangles: usize,
    pub total_meshes: usize,
    pub total_materials: usize,
    pub total_textures: usize,
}

/// Issue counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl IssueSummary {
    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Critical => self.critical,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.warning + self.error + self.critical
    }
}

/// Complete validation result for one scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub file_path: PathBuf,
    pub is_valid: bool,
    pub statistics: Statistics,
    pub global_issues: Vec<ValidationIssue>,
    pub mesh_results: Vec<MeshValidationResult>,
    pub material_results: Vec<MaterialValidationResult>,
}

impl ValidationResult {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            is_valid: true,
            statistics: Statistics::default(),
            global_issues: Vec::new(),
            mesh_results: Vec::new(),
            material_results: Vec::new(),
        }
    }

    /// Every issue: global first, then per mesh, then per material
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.global_issues
            .iter()
            .chain(self.mesh_results.iter().flat_map(|m| m.issues.iter()))
            .chain(self.material_results.iter().flat_map(|m| m.issues.iter()))
    }

    pub fn issue_count(&self) -> usize {
        self.issues().count()
    }

    pub fn summary(&self) -> IssueSummary {
        let mut summary = IssueSummary::default();
        for issue in self.issues() {
            summary.add(issue.severity);
        }
        summary
    }

    /// Re-derive `is_valid` from the issue lists
    pub fn update_validity(&mut self) {
        let valid = !self.issues().any(|issue| issue.severity.is_failure());
        self.is_valid = valid;
    }
}
