// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! glTF/GLB importer
//!
//! Buffers are resolved eagerly but images are not decoded, so a missing
//! texture file surfaces as a validation finding instead of a load failure.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use gltf::buffer::Data;
use gltf::image::Source;
use gltf::mesh::Mode;
use log::{debug, info, warn};
use nalgebra::{Point2, Point3, Vector3};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::texture_probe::{probe_bytes, probe_file, ImageInfo};
use super::LoadError;
use crate::scene::{MaterialRecord, MeshRecord, SceneModel, TextureRecord, TextureSlot};

/// Where a referenced image lives
enum ImageSource {
    /// Relative (decoded) URI next to the asset
    File(String),
    /// Data URI or buffer view; `bytes` is `None` when the payload is unreadable
    Embedded { bytes: Option<Vec<u8>>, format: String },
}

/// Import a `.gltf` or `.glb` file into a scene model.
///
/// Meshes appear in declaration order, one record per triangle primitive.
/// Textures are the sorted, de-duplicated set of images referenced by
/// material slots.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<SceneModel, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    info!("Loading glTF file: {}", path.display());

    let to_error = |source| LoadError::Gltf {
        path: path.to_path_buf(),
        source,
    };
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(to_error)?;
    let base_dir = path.parent();
    let buffers = gltf::import_buffers(&document, base_dir, blob).map_err(to_error)?;

    let mut scene = SceneModel::new(path);
    let mut images = BTreeMap::new();

    for material in document.materials() {
        let record = read_material(&material, &buffers, &mut images);
        debug!("Processed material: {}", record.name);
        scene.materials.push(record);
    }

    for (reference, source) in images {
        scene.textures.push(read_texture(reference, source, base_dir));
    }

    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or_default();
        let primitive_count = mesh.primitives().count();

        for (i, primitive) in mesh.primitives().enumerate() {
            let name = if primitive_count > 1 && !mesh_name.is_empty() {
                format!("{}_{}", mesh_name, i)
            } else {
                mesh_name.to_string()
            };

            if primitive.mode() != Mode::Triangles {
                warn!(
                    "Skipping primitive {} of mesh '{}': {:?} is not a triangle list",
                    i,
                    mesh_name,
                    primitive.mode()
                );
                continue;
            }

            let record = read_primitive(name, &primitive, &buffers)?;
            debug!(
                "Processed mesh '{}': {} vertices, {} triangles",
                record.name(),
                record.vertex_count(),
                record.triangle_count()
            );
            scene.meshes.push(record);
        }
    }

    scene.recompute_totals();
    info!(
        "Loaded {} meshes, {} materials, {} textures ({} vertices, {} triangles)",
        scene.meshes.len(),
        scene.materials.len(),
        scene.textures.len(),
        scene.total_vertices,
        scene.total_triangles
    );

    Ok(scene)
}

fn read_primitive(name: String, primitive: &gltf::Primitive, buffers: &[Data]) -> Result<MeshRecord, LoadError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<Point3<f32>> = reader
        .read_positions()
        .ok_or_else(|| LoadError::MissingPositions { mesh: name.clone() })?
        .map(Point3::from)
        .collect();

    // Non-indexed primitives draw their vertices in order.
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let invalid = |source| LoadError::InvalidMesh {
        mesh: name.clone(),
        source,
    };

    let mut record = MeshRecord::new(name.clone(), positions, indices).map_err(invalid)?;
    if let Some(normals) = reader.read_normals() {
        record = record.with_normals(normals.map(Vector3::from).collect()).map_err(invalid)?;
    }
    if let Some(uvs) = reader.read_tex_coords(0) {
        record = record.with_uvs(uvs.into_f32().map(Point2::from).collect()).map_err(invalid)?;
    }
    if let Some(index) = primitive.material().index() {
        record = record.with_material(index);
    }

    Ok(record)
}

fn read_material(
    material: &gltf::Material,
    buffers: &[Data],
    images: &mut BTreeMap<String, ImageSource>,
) -> MaterialRecord {
    let mut record = MaterialRecord::new(material.name().unwrap_or_default());

    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();
    record.albedo = Vector3::new(r, g, b);
    record.metallic = pbr.metallic_factor();
    record.roughness = pbr.roughness_factor();

    let slots = [
        (TextureSlot::Albedo, pbr.base_color_texture().map(|info| info.texture())),
        (TextureSlot::Normal, material.normal_texture().map(|normal| normal.texture())),
        (
            TextureSlot::MetallicRoughness,
            pbr.metallic_roughness_texture().map(|info| info.texture()),
        ),
        (TextureSlot::Emissive, material.emissive_texture().map(|info| info.texture())),
        (
            TextureSlot::Occlusion,
            material.occlusion_texture().map(|occlusion| occlusion.texture()),
        ),
    ];

    for (slot, texture) in slots {
        if let Some(texture) = texture {
            let (reference, source) = image_reference(&texture.source(), buffers);
            record.set_texture(slot, reference.clone());
            images.entry(reference).or_insert(source);
        }
    }

    record
}

/// Reference string for an image plus where its bytes can be found
fn image_reference(image: &gltf::Image, buffers: &[Data]) -> (String, ImageSource) {
    match image.source() {
        Source::Uri { uri, mime_type } => {
            if uri.starts_with("data:") {
                let format = format_from_mime(mime_type.or_else(|| data_uri_mime(uri)));
                let bytes = decode_data_uri(uri);
                (embedded_name(image, &format), ImageSource::Embedded { bytes, format })
            } else {
                let decoded = decode_uri(uri);
                (decoded.clone(), ImageSource::File(decoded))
            }
        }
        Source::View { view, mime_type } => {
            let start = view.offset();
            let bytes = buffers
                .get(view.buffer().index())
                .and_then(|data| data.0.get(start..start + view.length()))
                .map(<[u8]>::to_vec);
            let format = format_from_mime(Some(mime_type));
            (embedded_name(image, &format), ImageSource::Embedded { bytes, format })
        }
    }
}

fn read_texture(reference: String, source: ImageSource, base_dir: Option<&Path>) -> TextureRecord {
    match source {
        ImageSource::File(uri) => {
            let full_path = match base_dir {
                Some(dir) => dir.join(&uri),
                None => PathBuf::from(&uri),
            };
            let mut record = TextureRecord::from_path(uri);

            if full_path.exists() {
                match probe_file(&full_path) {
                    Ok(info) => apply_info(&mut record, info),
                    Err(e) => warn!("Failed to read texture header {}: {}", full_path.display(), e),
                }
            } else {
                info!("Texture file not found: {}", full_path.display());
            }
            record
        }
        ImageSource::Embedded { bytes, format } => {
            let mut record = TextureRecord {
                name: reference,
                format,
                ..TextureRecord::default()
            };

            match bytes.as_deref().map(probe_bytes) {
                Some(Ok(info)) => apply_info(&mut record, info),
                Some(Err(e)) => warn!("Failed to read embedded image '{}': {}", record.name, e),
                None => warn!("Embedded image '{}' has no readable data", record.name),
            }
            record
        }
    }
}

fn apply_info(record: &mut TextureRecord, info: ImageInfo) {
    record.width = info.width;
    record.height = info.height;
    record.channels = info.channels;
}

/// Name for an embedded image: its declared name, else `image_<index>`,
/// with an extension matching its MIME type when it has none
fn embedded_name(image: &gltf::Image, format: &str) -> String {
    let name = image
        .name()
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("image_{}", image.index()));

    if format.is_empty() || Path::new(&name).extension().is_some() {
        name
    } else {
        format!("{}.{}", name, format)
    }
}

fn format_from_mime(mime_type: Option<&str>) -> String {
    match mime_type {
        Some("image/jpeg") => "jpg".to_string(),
        Some(mime) => mime
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase(),
        None => String::new(),
    }
}

fn data_uri_mime(uri: &str) -> Option<&str> {
    uri.strip_prefix("data:")?
        .split([';', ','])
        .next()
        .filter(|mime| !mime.is_empty())
}

fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let (header, payload) = uri.strip_prefix("data:")?.split_once(',')?;
    if header.ends_with(";base64") {
        STANDARD.decode(payload).ok()
    } else {
        Some(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Decode `%XX` escapes in a URI; malformed escapes are kept verbatim
fn decode_uri(uri: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(uri.as_bytes())).into_owned()
}
