// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Texture header probing. Only the image header is decoded.

use image::{ImageDecoder, ImageReader, ImageResult};
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

/// Dimensions and channel count read from an image header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

/// Probe an image file on disk
pub fn probe_file(path: &Path) -> ImageResult<ImageInfo> {
    probe(ImageReader::open(path)?)
}

/// Probe an in-memory image (embedded glTF images)
pub fn probe_bytes(bytes: &[u8]) -> ImageResult<ImageInfo> {
    probe(ImageReader::new(Cursor::new(bytes)))
}

fn probe<R: BufRead + Seek>(reader: ImageReader<R>) -> ImageResult<ImageInfo> {
    let decoder = reader.with_guessed_format()?.into_decoder()?;
    let (width, height) = decoder.dimensions();
    Ok(ImageInfo {
        width,
        height,
        channels: u32::from(decoder.color_type().channel_count()),
    })
}
