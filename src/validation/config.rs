// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Validation configuration system
//!
//! Configuration files group their keys under `polygon_limits`,
//! `texture_limits`, `uv_validation`, `naming_conventions`,
//! `material_validation`, `file_validation` and `performance`. Every key is
//! optional; anything missing keeps its default. Files ending in `.toml` are
//! read and written as TOML, everything else as JSON.

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading, writing or interpreting a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("invalid {field} '{pattern}': {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// On-disk representation of a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonLimits {
    pub max_triangles_per_mesh: u32,
    pub max_vertices_per_mesh: u32,
    pub max_total_triangles: u32,
}

impl Default for PolygonLimits {
    fn default() -> Self {
        Self {
            max_triangles_per_mesh: 50_000,
            max_vertices_per_mesh: 65_536,
            max_total_triangles: 500_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureLimits {
    pub max_texture_width: u32,
    pub max_texture_height: u32,
    pub require_power_of_two: bool,
    pub allowed_texture_formats: Vec<String>,
}

impl Default for TextureLimits {
    fn default() -> Self {
        Self {
            max_texture_width: 4096,
            max_texture_height: 4096,
            require_power_of_two: true,
            allowed_texture_formats: ["png", "jpg", "jpeg", "tga", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvValidation {
    pub check_uv_range: bool,
    pub check_uv_overlaps: bool,
    pub uv_tolerance: f32,
}

impl Default for UvValidation {
    fn default() -> Self {
        Self {
            check_uv_range: true,
            check_uv_overlaps: true,
            uv_tolerance: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConventions {
    pub enforce_naming_conventions: bool,
    pub mesh_name_pattern: String,
    pub material_name_pattern: String,
    pub texture_name_pattern: String,
}

impl Default for NamingConventions {
    fn default() -> Self {
        Self {
            enforce_naming_conventions: true,
            mesh_name_pattern: "^[a-zA-Z][a-zA-Z0-9_]*$".to_string(),
            material_name_pattern: "^[a-zA-Z][a-zA-Z0-9_]*$".to_string(),
            texture_name_pattern: r"^[a-zA-Z][a-zA-Z0-9_]*\.(png|jpg|jpeg|tga|bmp)$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialValidation {
    pub require_albedo_texture: bool,
    pub require_normal_texture: bool,
    pub require_metallic_roughness_texture: bool,
    pub require_emissive_texture: bool,
    pub require_occlusion_texture: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidation {
    /// Report textures whose file is missing on disk
    pub check_file_exists: bool,
    /// Run the texture rule group (resolution, format, power-of-two)
    pub validate_texture_files: bool,
}

impl Default for FileValidation {
    fn default() -> Self {
        Self {
            check_file_exists: true,
            validate_texture_files: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub enable_detailed_logging: bool,
    pub generate_suggestions: bool,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            enable_detailed_logging: true,
            generate_suggestions: true,
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub polygon_limits: PolygonLimits,
    pub texture_limits: TextureLimits,
    pub uv_validation: UvValidation,
    pub naming_conventions: NamingConventions,
    pub material_validation: MaterialValidation,
    pub file_validation: FileValidation,
    pub performance: PerformanceSettings,
}

impl ValidationConfig {
    /// Load configuration from file, falling back to defaults.
    ///
    /// A missing, unreadable or malformed file is logged as a warning and
    /// yields `ValidationConfig::default()`. This never fails.
    pub fn load_from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Failed to load config from {:?}: {}", path, err);
                warn!("Using default configuration");
                Self::default()
            }
        }
    }

    /// Load configuration from file, reporting any problem to the caller
    pub fn try_load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, ConfigFormat::from_path(path)).map_err(|message| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            }
        })?;
        config.check_patterns()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|err| ConfigError::Serialize(err.to_string()))?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|err| ConfigError::Serialize(err.to_string()))?,
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self, String> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|err| err.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|err| err.to_string()),
        }
    }

    pub fn mesh_name_regex(&self) -> Result<Regex, ConfigError> {
        compile("mesh_name_pattern", &self.naming_conventions.mesh_name_pattern)
    }

    pub fn material_name_regex(&self) -> Result<Regex, ConfigError> {
        compile("material_name_pattern", &self.naming_conventions.material_name_pattern)
    }

    pub fn texture_name_regex(&self) -> Result<Regex, ConfigError> {
        compile("texture_name_pattern", &self.naming_conventions.texture_name_pattern)
    }

    /// Compile every naming pattern once, returning the first failure
    pub fn check_patterns(&self) -> Result<(), ConfigError> {
        self.mesh_name_regex()?;
        self.material_name_regex()?;
        self.texture_name_regex()?;
        Ok(())
    }

    /// Check if a texture format (extension) is on the allow-list
    pub fn is_format_allowed(&self, format: &str) -> bool {
        self.texture_limits
            .allowed_texture_formats
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(format))
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}
