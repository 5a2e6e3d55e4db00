// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Texture records

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Texture metadata. Zero width or height means the size is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRecord {
    pub name: String,
    pub file_path: String,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Lower-cased file extension without the dot
    pub format: String,
}

impl TextureRecord {
    /// Derive name and format from a (relative) file path
    pub fn from_path(file_path: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let path = Path::new(&file_path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self {
            name,
            file_path,
            format,
            ..Self::default()
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32, channels: u32) -> Self {
        self.width = width;
        self.height = height;
        self.channels = channels;
        self
    }

    pub fn has_known_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
