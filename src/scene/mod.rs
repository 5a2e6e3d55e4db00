// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene model - the in-memory asset the validator consumes

mod material;
mod mesh;
mod texture;

pub use material::{MaterialRecord, TextureSlot};
pub use mesh::MeshRecord;
pub use texture::TextureRecord;

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Structural problems detected while building scene records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("{attribute} count {actual} does not match vertex count {expected}")]
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Serialize a path as text, replacing non-UTF-8 bytes
pub(crate) fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// A loaded scene: meshes, materials and textures in declaration order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneModel {
    #[serde(serialize_with = "serialize_path_lossy")]
    pub file_path: PathBuf,
    pub meshes: Vec<MeshRecord>,
    pub materials: Vec<MaterialRecord>,
    pub textures: Vec<TextureRecord>,
    /// Cached totals. Derived from `meshes`; may be stale.
    pub total_vertices: usize,
    /// Cached totals. Derived from `meshes`; may be stale.
    pub total_triangles: usize,
}

impl SceneModel {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Refresh the cached vertex/triangle totals from the mesh list
    pub fn recompute_totals(&mut self) {
        self.total_vertices = self.meshes.iter().map(MeshRecord::vertex_count).sum();
        self.total_triangles = self.meshes.iter().map(MeshRecord::triangle_count).sum();
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty() && self.textures.is_empty()
    }
}
