// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh records

use super::SceneError;
use nalgebra::{Point2, Point3, Vector3};
use serde::Serialize;

/// Triangle mesh as delivered by a loader.
///
/// Normals and UVs are either absent or carry exactly one entry per vertex;
/// the constructors reject anything in between.
#[derive(Debug, Clone, Serialize)]
pub struct MeshRecord {
    name: String,
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    uvs: Vec<Point2<f32>>,
    indices: Vec<u32>,
    material_indices: Vec<usize>,
}

impl MeshRecord {
    /// Create a mesh from positions and a flat triangle index list
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Point3<f32>>,
        indices: Vec<u32>,
    ) -> Result<Self, SceneError> {
        if indices.len() % 3 != 0 {
            return Err(SceneError::IndexCountNotTriangles(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(SceneError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            indices,
            material_indices: Vec::new(),
        })
    }

    /// Attach per-vertex normals
    pub fn with_normals(mut self, normals: Vec<Vector3<f32>>) -> Result<Self, SceneError> {
        check_attribute("normal", self.positions.len(), normals.len())?;
        self.normals = normals;
        Ok(self)
    }

    /// Attach per-vertex texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<Point2<f32>>) -> Result<Self, SceneError> {
        check_attribute("uv", self.positions.len(), uvs.len())?;
        self.uvs = uvs;
        Ok(self)
    }

    /// Reference a material by its index in the scene's material list
    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_indices.push(material_index);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[Vector3<f32>]> {
        (!self.normals.is_empty()).then_some(self.normals.as_slice())
    }

    pub fn uvs(&self) -> Option<&[Point2<f32>]> {
        (!self.uvs.is_empty()).then_some(self.uvs.as_slice())
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material_indices(&self) -> &[usize] {
        &self.material_indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

fn check_attribute(attribute: &'static str, expected: usize, actual: usize) -> Result<(), SceneError> {
    // An empty array means "absent", which is always allowed.
    if actual != 0 && actual != expected {
        return Err(SceneError::AttributeLengthMismatch {
            attribute,
            expected,
            actual,
        });
    }
    Ok(())
}
