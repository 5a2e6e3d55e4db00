// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - glTF/GLB import and texture probing

mod gltf_loader;
mod texture_probe;

pub use gltf_loader::load_gltf;
pub use texture_probe::{probe_bytes, probe_file, ImageInfo};

use std::path::PathBuf;
use thiserror::Error;

use crate::scene::SceneError;

/// Fatal import failures. No scene is produced when one of these occurs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to import {}: {source}", .path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("mesh '{mesh}' has no vertex positions")]
    MissingPositions { mesh: String },
    #[error("mesh '{mesh}' is malformed: {source}")]
    InvalidMesh {
        mesh: String,
        #[source]
        source: SceneError,
    },
}
