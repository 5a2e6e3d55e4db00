// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material records

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Named texture slots of a PBR material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    Albedo,
    Normal,
    MetallicRoughness,
    Emissive,
    Occlusion,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::Albedo,
        TextureSlot::Normal,
        TextureSlot::MetallicRoughness,
        TextureSlot::Emissive,
        TextureSlot::Occlusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextureSlot::Albedo => "albedo",
            TextureSlot::Normal => "normal",
            TextureSlot::MetallicRoughness => "metallic-roughness",
            TextureSlot::Emissive => "emissive",
            TextureSlot::Occlusion => "occlusion",
        }
    }
}

/// PBR material. Scalars are stored as given; range checks happen in validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub name: String,
    pub albedo: Vector3<f32>,
    pub metallic: f32,
    pub roughness: f32,
    pub albedo_texture: Option<String>,
    pub normal_texture: Option<String>,
    pub metallic_roughness_texture: Option<String>,
    pub emissive_texture: Option<String>,
    pub occlusion_texture: Option<String>,
}

impl MaterialRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            albedo: Vector3::new(1.0, 1.0, 1.0),
            metallic: 0.0,
            roughness: 1.0,
            albedo_texture: None,
            normal_texture: None,
            metallic_roughness_texture: None,
            emissive_texture: None,
            occlusion_texture: None,
        }
    }

    /// Assign a texture path to a slot. Empty paths clear the slot.
    pub fn set_texture(&mut self, slot: TextureSlot, path: impl Into<String>) {
        let path = path.into();
        *self.slot_mut(slot) = (!path.is_empty()).then_some(path);
    }

    pub fn with_texture(mut self, slot: TextureSlot, path: impl Into<String>) -> Self {
        self.set_texture(slot, path);
        self
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        match slot {
            TextureSlot::Albedo => self.albedo_texture.as_deref(),
            TextureSlot::Normal => self.normal_texture.as_deref(),
            TextureSlot::MetallicRoughness => self.metallic_roughness_texture.as_deref(),
            TextureSlot::Emissive => self.emissive_texture.as_deref(),
            TextureSlot::Occlusion => self.occlusion_texture.as_deref(),
        }
    }

    /// All non-empty texture references in slot order
    pub fn texture_references(&self) -> Vec<String> {
        TextureSlot::ALL
            .iter()
            .filter_map(|&slot| self.texture(slot))
            .map(str::to_string)
            .collect()
    }

    fn slot_mut(&mut self, slot: TextureSlot) -> &mut Option<String> {
        match slot {
            TextureSlot::Albedo => &mut self.albedo_texture,
            TextureSlot::Normal => &mut self.normal_texture,
            TextureSlot::MetallicRoughness => &mut self.metallic_roughness_texture,
            TextureSlot::Emissive => &mut self.emissive_texture,
            TextureSlot::Occlusion => &mut self.occlusion_texture,
        }
    }
}
