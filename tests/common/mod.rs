// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared fixtures: in-memory scenes and a small glTF/GLB writer

#![allow(dead_code)]

use anyhow::Result;
use asset_validator::scene::MeshRecord;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nalgebra::{Point2, Point3, Vector3};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;

/// Flat `cells` x `cells` grid in the XY plane with normals and non-overlapping UVs
pub fn grid_mesh(name: &str, cells: u32) -> MeshRecord {
    let side = cells + 1;
    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for y in 0..side {
        for x in 0..side {
            positions.push(Point3::new(x as f32, y as f32, 0.0));
            uvs.push(Point2::new(x as f32 / cells as f32, y as f32 / cells as f32));
        }
    }

    let mut indices = Vec::new();
    for y in 0..cells {
        for x in 0..cells {
            let i = y * side + x;
            indices.extend_from_slice(&[i, i + 1, i + side + 1, i, i + side + 1, i + side]);
        }
    }

    let normals = vec![Vector3::z(); positions.len()];
    MeshRecord::new(name, positions, indices)
        .and_then(|mesh| mesh.with_normals(normals))
        .and_then(|mesh| mesh.with_uvs(uvs))
        .unwrap()
}

/// Mesh with exactly `vertices` vertices and `triangles` triangles and no attributes
pub fn bare_mesh(name: &str, vertices: usize, triangles: usize) -> MeshRecord {
    let positions: Vec<_> = (0..vertices)
        .map(|i| Point3::new(i as f32, (i % 7) as f32, (i % 3) as f32))
        .collect();
    let indices: Vec<u32> = (0..triangles * 3).map(|i| (i % vertices) as u32).collect();
    MeshRecord::new(name, positions, indices).unwrap()
}

/// Encode a solid RGBA image as PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::from_pixel(width, height, image::Rgba([128, 128, 255, 255]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Geometry for one triangle primitive
pub struct Primitive<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: Option<&'a [[f32; 3]]>,
    pub uvs: Option<&'a [[f32; 2]]>,
    pub indices: &'a [u32],
    pub material: Option<usize>,
}

impl<'a> Primitive<'a> {
    pub fn new(positions: &'a [[f32; 3]], indices: &'a [u32]) -> Self {
        Self {
            positions,
            normals: None,
            uvs: None,
            indices,
            material: None,
        }
    }
}

/// Builds a glTF document around a single binary buffer
#[derive(Default)]
pub struct GltfBuilder {
    buffer: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    materials: Vec<Value>,
    textures: Vec<Value>,
    images: Vec<Value>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&mut self, name: &str, primitives: &[Primitive]) -> &mut Self {
        let primitives: Vec<Value> = primitives.iter().map(|p| self.primitive(p)).collect();
        self.meshes.push(json!({ "name": name, "primitives": primitives }));
        self
    }

    pub fn material(&mut self, material: Value) -> &mut Self {
        self.materials.push(material);
        self
    }

    /// Add an image and a texture sampling it; returns the texture index
    pub fn texture(&mut self, image: Value) -> usize {
        self.images.push(image);
        self.textures.push(json!({ "source": self.images.len() - 1 }));
        self.textures.len() - 1
    }

    /// Store raw bytes in the buffer and return the view index
    pub fn buffer_view(&mut self, bytes: &[u8], target: Option<u32>) -> usize {
        align_to_four(&mut self.buffer);
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        let mut view = json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len()
        });
        if let Some(target) = target {
            view["target"] = json!(target);
        }
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    /// Write a `.gltf` with the buffer embedded as a base64 data URI
    pub fn write_gltf(&self, path: &Path) -> Result<()> {
        let uri = format!("data:application/octet-stream;base64,{}", STANDARD.encode(&self.buffer));
        let document = self.document(Some(uri));
        std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
        Ok(())
    }

    /// Write a binary `.glb`
    pub fn write_glb(&self, path: &Path) -> Result<()> {
        let json_string = serde_json::to_string(&self.document(None))?;
        let mut json_bytes = json_string.into_bytes();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        let mut bin = self.buffer.clone();
        align_to_four(&mut bin);

        let total_length = 12 + 8 + json_bytes.len() + 8 + bin.len();
        let mut file = File::create(path)?;

        file.write_all(&0x46546C67u32.to_le_bytes())?; // "glTF"
        file.write_all(&2u32.to_le_bytes())?;
        file.write_all(&(total_length as u32).to_le_bytes())?;

        file.write_all(&(json_bytes.len() as u32).to_le_bytes())?;
        file.write_all(&0x4E4F534Au32.to_le_bytes())?; // "JSON"
        file.write_all(&json_bytes)?;

        file.write_all(&(bin.len() as u32).to_le_bytes())?;
        file.write_all(&0x004E4942u32.to_le_bytes())?; // "BIN\0"
        file.write_all(&bin)?;

        Ok(())
    }

    fn primitive(&mut self, primitive: &Primitive) -> Value {
        let (min, max) = bounds(primitive.positions);
        let position_bytes: Vec<u8> = primitive.positions.iter().flatten().flat_map(|c| c.to_le_bytes()).collect();
        let view = self.buffer_view(&position_bytes, Some(ARRAY_BUFFER));
        let position = self.accessor(view, FLOAT, primitive.positions.len(), "VEC3", Some((min, max)));

        let mut attributes = json!({ "POSITION": position });

        if let Some(normals) = primitive.normals {
            let bytes: Vec<u8> = normals.iter().flatten().flat_map(|c| c.to_le_bytes()).collect();
            let view = self.buffer_view(&bytes, Some(ARRAY_BUFFER));
            attributes["NORMAL"] = json!(self.accessor(view, FLOAT, normals.len(), "VEC3", None));
        }

        if let Some(uvs) = primitive.uvs {
            let bytes: Vec<u8> = uvs.iter().flatten().flat_map(|c| c.to_le_bytes()).collect();
            let view = self.buffer_view(&bytes, Some(ARRAY_BUFFER));
            attributes["TEXCOORD_0"] = json!(self.accessor(view, FLOAT, uvs.len(), "VEC2", None));
        }

        let index_bytes: Vec<u8> = primitive.indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.buffer_view(&index_bytes, Some(ELEMENT_ARRAY_BUFFER));
        let indices = self.accessor(view, UNSIGNED_INT, primitive.indices.len(), "SCALAR", None);

        let mut value = json!({ "attributes": attributes, "indices": indices, "mode": 4 });
        if let Some(material) = primitive.material {
            value["material"] = json!(material);
        }
        value
    }

    fn accessor(
        &mut self,
        view: usize,
        component_type: u32,
        count: usize,
        kind: &str,
        bounds: Option<([f32; 3], [f32; 3])>,
    ) -> usize {
        let mut accessor = json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": component_type,
            "count": count,
            "type": kind
        });
        if let Some((min, max)) = bounds {
            accessor["min"] = json!(min);
            accessor["max"] = json!(max);
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn document(&self, buffer_uri: Option<String>) -> Value {
        let mut buffer = json!({ "byteLength": self.buffer.len() });
        if let Some(uri) = buffer_uri {
            buffer["uri"] = json!(uri);
        }

        let mut document = json!({
            "asset": { "generator": "asset-validator tests", "version": "2.0" },
            "accessors": self.accessors,
            "bufferViews": self.buffer_views,
            "buffers": [buffer],
            "meshes": self.meshes,
        });
        if !self.materials.is_empty() {
            document["materials"] = json!(self.materials);
        }
        if !self.textures.is_empty() {
            document["textures"] = json!(self.textures);
            document["images"] = json!(self.images);
        }
        document
    }
}

fn bounds(positions: &[[f32; 3]]) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for p in positions {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    (min, max)
}

fn align_to_four(bytes: &mut Vec<u8>) {
    while bytes.len() % 4 != 0 {
        bytes.push(0);
    }
}
