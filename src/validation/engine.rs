// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Validation engine - evaluates the rule groups against a scene
//!
//! Issues are appended in declaration order (meshes, materials, textures)
//! and, within one entity, in rule order. Scene-wide findings, duplicate
//! names and texture findings land in the global list.

use ahash::AHashSet;
use log::debug;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

use super::config::{ConfigError, ValidationConfig};
use super::types::{
    MaterialValidationResult, MeshValidationResult, Severity, Statistics, ValidationIssue,
    ValidationResult,
};
use super::uv;
use crate::scene::{MaterialRecord, MeshRecord, SceneModel, TextureRecord, TextureSlot};

/// Meshes above this count get a performance warning
pub const MESH_COUNT_SOFT_LIMIT: usize = 1000;

/// Meshes with fewer triangles than this (but more than zero) get an info note
pub const LOW_POLY_THRESHOLD: usize = 10;

/// Normals shorter than this are treated as zero-length
const MIN_NORMAL_LENGTH: f32 = 1e-6;

const SCENE_LOCATION: &str = "Scene";

struct NamePatterns {
    mesh: Regex,
    material: Regex,
    texture: Regex,
}

/// Rule evaluator bound to one configuration.
///
/// Construction compiles the naming patterns, so `validate` itself cannot fail.
pub struct Validator {
    config: ValidationConfig,
    patterns: Option<NamePatterns>,
}

/// Validate a scene under a configuration
pub fn validate(scene: &SceneModel, config: &ValidationConfig) -> Result<ValidationResult, ConfigError> {
    Ok(Validator::new(config.clone())?.validate(scene))
}

/// Recompute aggregate statistics from the scene's entity lists
pub fn calculate_statistics(scene: &SceneModel) -> Statistics {
    Statistics {
        total_vertices: scene.meshes.iter().map(MeshRecord::vertex_count).sum(),
        total_triangles: scene.meshes.iter().map(MeshRecord::triangle_count).sum(),
        total_meshes: scene.meshes.len(),
        total_materials: scene.materials.len(),
        total_textures: scene.textures.len(),
    }
}

pub fn is_power_of_two(n: u32) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// Collects issues for one list, dropping suggestions when they are disabled
struct IssueList<'a> {
    issues: &'a mut Vec<ValidationIssue>,
    suggestions: bool,
}

impl IssueList<'_> {
    fn push(
        &mut self,
        severity: Severity,
        category: &str,
        message: impl Into<String>,
        location: &str,
        suggestion: impl Into<String>,
    ) {
        let mut issue = ValidationIssue::new(severity, category, message, location);
        if self.suggestions {
            issue = issue.with_suggestion(suggestion);
        }
        self.issues.push(issue);
    }
}

/// Name used in results and locations; empty names get a positional fallback
fn display_name<'a>(name: &'a str, kind: &str, index: usize) -> Cow<'a, str> {
    if name.is_empty() {
        Cow::Owned(format!("{}_{}", kind, index))
    } else {
        Cow::Borrowed(name)
    }
}

impl Validator {
    /// Create a validator, compiling naming patterns when naming is enforced
    pub fn new(config: ValidationConfig) -> Result<Self, ConfigError> {
        let patterns = if config.naming_conventions.enforce_naming_conventions {
            Some(NamePatterns {
                mesh: config.mesh_name_regex()?,
                material: config.material_name_regex()?,
                texture: config.texture_name_regex()?,
            })
        } else {
            None
        };
        Ok(Self { config, patterns })
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run every enabled rule group against the scene
    pub fn validate(&self, scene: &SceneModel) -> ValidationResult {
        let mut result = ValidationResult::new(scene.file_path.clone());

        self.validate_scene_limits(scene, &mut result.global_issues);

        if self.patterns.is_some() {
            self.validate_duplicate_names(scene, &mut result.global_issues);
        }

        result.mesh_results = scene
            .meshes
            .iter()
            .enumerate()
            .map(|(index, mesh)| self.validate_mesh(index, mesh))
            .collect();

        result.material_results = scene
            .materials
            .iter()
            .enumerate()
            .map(|(index, material)| self.validate_material(index, material))
            .collect();

        let base_dir = scene.file_path.parent();
        for (index, texture) in scene.textures.iter().enumerate() {
            self.validate_texture(index, texture, base_dir, &mut result.global_issues);
        }

        result.statistics = calculate_statistics(scene);
        result.update_validity();

        if self.config.performance.enable_detailed_logging {
            debug!(
                "Validated {:?}: {} issues, valid = {}",
                scene.file_path,
                result.issue_count(),
                result.is_valid
            );
        }

        result
    }

    fn sink<'a>(&self, issues: &'a mut Vec<ValidationIssue>) -> IssueList<'a> {
        IssueList {
            issues,
            suggestions: self.config.performance.generate_suggestions,
        }
    }

    fn validate_scene_limits(&self, scene: &SceneModel, issues: &mut Vec<ValidationIssue>) {
        let mut issues = self.sink(issues);
        let limits = &self.config.polygon_limits;

        // Totals are recomputed; the scene's cached fields may be stale.
        let total_triangles: usize = scene.meshes.iter().map(MeshRecord::triangle_count).sum();
        if total_triangles > limits.max_total_triangles as usize {
            issues.push(
                Severity::Error,
                "performance",
                format!(
                    "Total triangle count ({}) exceeds limit ({})",
                    total_triangles, limits.max_total_triangles
                ),
                SCENE_LOCATION,
                format!("Reduce total triangles to under {}", limits.max_total_triangles),
            );
        }

        if scene.meshes.len() > MESH_COUNT_SOFT_LIMIT {
            issues.push(
                Severity::Warning,
                "performance",
                format!("High mesh count: {}", scene.meshes.len()),
                SCENE_LOCATION,
                "Consider merging meshes to improve performance",
            );
        }
    }

    fn validate_duplicate_names(&self, scene: &SceneModel, issues: &mut Vec<ValidationIssue>) {
        let mut issues = self.sink(issues);

        let meshes = scene
            .meshes
            .iter()
            .enumerate()
            .map(|(i, m)| display_name(m.name(), "mesh", i));
        report_duplicates(&mut issues, "mesh", "meshes", meshes);

        let materials = scene
            .materials
            .iter()
            .enumerate()
            .map(|(i, m)| display_name(&m.name, "material", i));
        report_duplicates(&mut issues, "material", "materials", materials);

        let textures = scene
            .textures
            .iter()
            .enumerate()
            .map(|(i, t)| display_name(&t.name, "texture", i));
        report_duplicates(&mut issues, "texture", "textures", textures);
    }

    fn validate_mesh(&self, index: usize, mesh: &MeshRecord) -> MeshValidationResult {
        let name = display_name(mesh.name(), "mesh", index);
        let mut issues = Vec::new();
        let mut list = self.sink(&mut issues);

        if mesh.name().is_empty() {
            list.push(
                Severity::Info,
                "naming",
                format!("Mesh has no name; using '{}'", name),
                &name,
                "Give every mesh a descriptive name",
            );
        }

        if mesh.vertex_count() == 0 {
            list.push(
                Severity::Warning,
                "geometry",
                "Mesh has no vertices",
                &name,
                "Remove empty meshes from the asset",
            );
        } else {
            self.validate_polygon_count(mesh, &name, &mut list);

            let uv_config = &self.config.uv_validation;
            if uv_config.check_uv_range || uv_config.check_uv_overlaps {
                self.validate_uv_coordinates(mesh, &name, &mut list);
            }

            self.validate_vertex_data(mesh, &name, &mut list);
        }

        if let Some(patterns) = &self.patterns {
            if !mesh.name().is_empty() && !patterns.mesh.is_match(mesh.name()) {
                list.push(
                    Severity::Warning,
                    "naming",
                    format!("Mesh name '{}' does not match naming convention", name),
                    &name,
                    format!(
                        "Rename to match pattern {}",
                        self.config.naming_conventions.mesh_name_pattern
                    ),
                );
            }
        }

        let has_valid_uvs = mesh.uvs().map_or(false, |uvs| {
            uvs.iter().all(|p| p.x.is_finite() && p.y.is_finite())
                && uv::count_out_of_range(uvs, self.config.uv_validation.uv_tolerance) == 0
        });

        if self.config.performance.enable_detailed_logging {
            debug!("Mesh '{}': {} issues", name, issues.len());
        }

        MeshValidationResult {
            name: name.into_owned(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            material_count: mesh.material_indices().len(),
            has_valid_uvs,
            issues,
        }
    }

    fn validate_polygon_count(&self, mesh: &MeshRecord, name: &str, issues: &mut IssueList) {
        let limits = &self.config.polygon_limits;
        let triangles = mesh.triangle_count();
        let vertices = mesh.vertex_count();

        if triangles > limits.max_triangles_per_mesh as usize {
            issues.push(
                Severity::Error,
                "geometry",
                format!(
                    "Triangle count ({}) exceeds limit ({})",
                    triangles, limits.max_triangles_per_mesh
                ),
                name,
                format!("Reduce triangles to under {}", limits.max_triangles_per_mesh),
            );
        }

        if vertices > limits.max_vertices_per_mesh as usize {
            issues.push(
                Severity::Error,
                "geometry",
                format!(
                    "Vertex count ({}) exceeds limit ({})",
                    vertices, limits.max_vertices_per_mesh
                ),
                name,
                format!("Reduce vertices to under {}", limits.max_vertices_per_mesh),
            );
        }

        if triangles == 0 {
            issues.push(
                Severity::Warning,
                "geometry",
                "Mesh has vertices but no triangles",
                name,
                "Remove the mesh or export its faces",
            );
        } else if triangles < LOW_POLY_THRESHOLD {
            issues.push(
                Severity::Info,
                "geometry",
                format!("Very low triangle count: {}", triangles),
                name,
                "Consider if this mesh is necessary",
            );
        }
    }

    fn validate_uv_coordinates(&self, mesh: &MeshRecord, name: &str, issues: &mut IssueList) {
        let uv_config = &self.config.uv_validation;

        let Some(uvs) = mesh.uvs() else {
            issues.push(
                Severity::Warning,
                "uv",
                "Mesh has no UV coordinates",
                name,
                "Add UV coordinates for texturing",
            );
            return;
        };

        if uv_config.check_uv_range {
            let outside = uv::count_out_of_range(uvs, uv_config.uv_tolerance);
            if outside > 0 {
                issues.push(
                    Severity::Warning,
                    "uv",
                    format!(
                        "UV coordinates outside 0-1 range detected ({} of {})",
                        outside,
                        uvs.len()
                    ),
                    name,
                    "Ensure UV coordinates are within 0-1 range",
                );
            }
        }

        if uv_config.check_uv_overlaps {
            let overlap = uv::measure_overlap(uvs, mesh.triangles());
            if overlap.ratio() > uv_config.uv_tolerance as f64 {
                issues.push(
                    Severity::Warning,
                    "uv",
                    format!(
                        "UV overlap detected: {:.2}% of UV area ({} overlapping triangle pairs)",
                        overlap.percentage(),
                        overlap.overlapping_pairs
                    ),
                    name,
                    "Repack UV islands so they do not overlap",
                );
            }
        }
    }

    fn validate_vertex_data(&self, mesh: &MeshRecord, name: &str, issues: &mut IssueList) {
        let bad_positions = mesh
            .positions()
            .iter()
            .filter(|p| !p.coords.iter().all(|c| c.is_finite()))
            .count();
        if bad_positions > 0 {
            issues.push(
                Severity::Critical,
                "geometry",
                format!("Mesh contains {} non-finite vertex positions (NaN/Inf)", bad_positions),
                name,
                "Fix or remove corrupted vertices before export",
            );
        }

        match mesh.normals() {
            None => issues.push(
                Severity::Info,
                "geometry",
                "Mesh has no vertex normals",
                name,
                "Export normals with the mesh",
            ),
            Some(normals) => {
                let non_finite = normals
                    .iter()
                    .filter(|n| !n.iter().all(|c| c.is_finite()))
                    .count();
                if non_finite > 0 {
                    issues.push(
                        Severity::Critical,
                        "geometry",
                        format!("Mesh contains {} non-finite normals (NaN/Inf)", non_finite),
                        name,
                        "Recalculate normals",
                    );
                }

                let zero_length = normals
                    .iter()
                    .filter(|n| n.iter().all(|c| c.is_finite()) && n.norm() < MIN_NORMAL_LENGTH)
                    .count();
                if zero_length > 0 {
                    issues.push(
                        Severity::Critical,
                        "geometry",
                        format!("Mesh contains {} zero-length normals", zero_length),
                        name,
                        "Recalculate normals",
                    );
                }
            }
        }

        if let Some(uvs) = mesh.uvs() {
            let non_finite = uvs
                .iter()
                .filter(|p| !(p.x.is_finite() && p.y.is_finite()))
                .count();
            if non_finite > 0 {
                issues.push(
                    Severity::Critical,
                    "geometry",
                    format!("Mesh contains {} non-finite UV coordinates (NaN/Inf)", non_finite),
                    name,
                    "Re-unwrap the mesh",
                );
            }
        }
    }

    fn validate_material(&self, index: usize, material: &MaterialRecord) -> MaterialValidationResult {
        let name = display_name(&material.name, "material", index);
        let mut issues = Vec::new();
        let mut list = self.sink(&mut issues);

        if material.name.is_empty() {
            list.push(
                Severity::Info,
                "naming",
                format!("Material has no name; using '{}'", name),
                &name,
                "Give every material a descriptive name",
            );
        }

        let required = &self.config.material_validation;
        let slots = [
            (TextureSlot::Albedo, required.require_albedo_texture),
            (TextureSlot::Normal, required.require_normal_texture),
            (TextureSlot::MetallicRoughness, required.require_metallic_roughness_texture),
            (TextureSlot::Emissive, required.require_emissive_texture),
            (TextureSlot::Occlusion, required.require_occlusion_texture),
        ];
        for (slot, is_required) in slots {
            if is_required && material.texture(slot).is_none() {
                list.push(
                    Severity::Error,
                    "material",
                    format!("Missing required {} texture", slot.as_str()),
                    &name,
                    format!("Assign a {} texture to this material", slot.as_str()),
                );
            }
        }

        for (label, value) in [("Metallic", material.metallic), ("Roughness", material.roughness)] {
            if !(0.0..=1.0).contains(&value) {
                list.push(
                    Severity::Warning,
                    "material",
                    format!("{} value ({}) outside 0-1 range", label, value),
                    &name,
                    format!("Clamp {} to the 0-1 range", label.to_lowercase()),
                );
            }
        }

        let albedo = material.albedo;
        if !albedo.iter().all(|c| (0.0..=1.0).contains(c)) {
            list.push(
                Severity::Warning,
                "material",
                format!(
                    "Albedo color ({}, {}, {}) outside 0-1 range",
                    albedo.x, albedo.y, albedo.z
                ),
                &name,
                "Clamp albedo color components to the 0-1 range",
            );
        }

        if let Some(patterns) = &self.patterns {
            if !material.name.is_empty() && !patterns.material.is_match(&material.name) {
                list.push(
                    Severity::Warning,
                    "naming",
                    format!("Material name '{}' does not match naming convention", name),
                    &name,
                    format!(
                        "Rename to match pattern {}",
                        self.config.naming_conventions.material_name_pattern
                    ),
                );
            }
        }

        let has_valid_textures = !issues.iter().any(|issue| issue.severity.is_failure());

        if self.config.performance.enable_detailed_logging {
            debug!("Material '{}': {} issues", name, issues.len());
        }

        MaterialValidationResult {
            name: name.into_owned(),
            textures: material.texture_references(),
            has_valid_textures,
            issues,
        }
    }

    fn validate_texture(
        &self,
        index: usize,
        texture: &TextureRecord,
        base_dir: Option<&Path>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let name = display_name(&texture.name, "texture", index);
        let mut list = self.sink(issues);
        let limits = &self.config.texture_limits;

        if texture.name.is_empty() {
            list.push(
                Severity::Info,
                "naming",
                format!("Texture has no name; using '{}'", name),
                &name,
                "Give every texture a descriptive file name",
            );
        }

        if self.config.file_validation.validate_texture_files {
            if !texture.has_known_dimensions() {
                list.push(
                    Severity::Info,
                    "texture",
                    "Texture dimensions unknown; resolution checks skipped",
                    &name,
                    "Make sure the texture file is readable",
                );
            } else if texture.width > limits.max_texture_width
                || texture.height > limits.max_texture_height
            {
                list.push(
                    Severity::Error,
                    "texture",
                    format!(
                        "Texture resolution ({}x{}) exceeds limit ({}x{})",
                        texture.width, texture.height, limits.max_texture_width, limits.max_texture_height
                    ),
                    &name,
                    format!(
                        "Downscale texture to at most {}x{}",
                        limits.max_texture_width, limits.max_texture_height
                    ),
                );
            }

            if texture.format.is_empty() {
                list.push(
                    Severity::Warning,
                    "texture",
                    "Texture format unknown (no file extension)",
                    &name,
                    "Use a file extension that identifies the image format",
                );
            } else if !self.config.is_format_allowed(&texture.format) {
                list.push(
                    Severity::Error,
                    "texture",
                    format!("Texture format '{}' is not allowed", texture.format),
                    &name,
                    format!("Convert to one of: {}", limits.allowed_texture_formats.join(", ")),
                );
            }

            if limits.require_power_of_two && texture.has_known_dimensions() {
                for (label, value) in [("width", texture.width), ("height", texture.height)] {
                    if !is_power_of_two(value) {
                        list.push(
                            Severity::Warning,
                            "texture",
                            format!("Texture {} ({}) is not a power of two", label, value),
                            &name,
                            format!("Resize to a power-of-two {} (e.g. 1024, 2048)", label),
                        );
                    }
                }
            }
        }

        // Embedded images have no file path to check.
        if self.config.file_validation.check_file_exists && !texture.file_path.is_empty() {
            let path = Path::new(&texture.file_path);
            let resolved = match base_dir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.to_path_buf(),
            };
            if !resolved.exists() {
                list.push(
                    Severity::Error,
                    "file",
                    format!("Texture file not found: {}", resolved.display()),
                    &name,
                    "Check the texture path relative to the asset file",
                );
            }
        }

        if let Some(patterns) = &self.patterns {
            if !texture.name.is_empty() && !patterns.texture.is_match(&texture.name) {
                list.push(
                    Severity::Warning,
                    "naming",
                    format!("Texture name '{}' does not match naming convention", name),
                    &name,
                    format!(
                        "Rename to match pattern {}",
                        self.config.naming_conventions.texture_name_pattern
                    ),
                );
            }
        }
    }
}

/// Warn once for every repeated name, in declaration order
fn report_duplicates<'a>(
    issues: &mut IssueList,
    kind: &str,
    plural: &str,
    names: impl Iterator<Item = Cow<'a, str>>,
) {
    let mut seen = AHashSet::new();
    for name in names {
        if !seen.insert(name.clone()) {
            issues.push(
                Severity::Warning,
                "naming",
                format!("Duplicate {} name: {}", kind, name),
                SCENE_LOCATION,
                format!("Use unique names for all {}", plural),
            );
        }
    }
}
