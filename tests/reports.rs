// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Report generation in every format

mod common;

use anyhow::Result;
use asset_validator::report::{ReportFormat, ReportOptions, Reporter};
use asset_validator::scene::{MaterialRecord, SceneModel, TextureSlot};
use asset_validator::validation::{validate, ValidationConfig, ValidationResult};
use common::{bare_mesh, grid_mesh};
use serde_json::Value;

fn failing_result() -> Result<ValidationResult> {
    let mut config = ValidationConfig::default();
    config.polygon_limits.max_triangles_per_mesh = 100;
    config.material_validation.require_albedo_texture = true;

    let mut scene = SceneModel::new("warehouse.gltf");
    scene.meshes.push(bare_mesh("Crate", 50, 150));
    scene.meshes.push(grid_mesh("Floor", 4));
    scene.materials.push(MaterialRecord::new("Wood"));
    scene
        .materials
        .push(MaterialRecord::new("Metal").with_texture(TextureSlot::Normal, "metal_n.png"));

    Ok(validate(&scene, &config)?)
}

#[test]
fn test_json_report_on_disk() -> Result<()> {
    let result = failing_result()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");

    let mut reporter = Reporter::new(ReportOptions::default());
    reporter.generate_report(&result, &path, ReportFormat::Json)?;

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(doc["isValid"], false);
    assert_eq!(doc["statistics"]["totalMeshes"], 2);
    assert_eq!(doc["statistics"]["totalMaterials"], 2);
    assert_eq!(doc["meshResults"][0]["name"], "Crate");
    assert_eq!(doc["meshResults"][0]["triangleCount"], 150);
    assert_eq!(doc["materialResults"][1]["textures"][0], "metal_n.png");
    assert_eq!(doc["materialResults"][0]["hasValidTextures"], false);
    assert_eq!(doc["issueSummary"]["total"], result.issue_count());
    assert!(doc["issueSummary"]["error"].as_u64().unwrap() >= 3);

    let severities: Vec<_> = doc["meshResults"][0]["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["severity"].as_str().unwrap().to_string())
        .collect();
    assert!(severities.contains(&"ERROR".to_string()));
    Ok(())
}

#[test]
fn test_html_report_on_disk() -> Result<()> {
    let result = failing_result()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.html");

    let mut reporter = Reporter::new(ReportOptions::default());
    reporter.generate_report(&result, &path, ReportFormat::Html)?;

    let html = std::fs::read_to_string(&path)?;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("FAILED"));
    assert!(html.contains("Triangle count (150) exceeds limit (100)"));
    assert!(html.contains("Missing required albedo texture"));
    assert!(html.contains("Statistics"));
    Ok(())
}

#[test]
fn test_console_render_matches_options() -> Result<()> {
    colored::control::set_override(false);
    let result = failing_result()?;

    let reporter = Reporter::new(ReportOptions {
        verbose: true,
        include_statistics: false,
        include_suggestions: true,
    });
    let text = reporter.render(&result, ReportFormat::Console)?;

    assert!(text.contains("FAILED"));
    assert!(text.contains("Mesh: Crate"));
    assert!(text.contains("Mesh: Floor"));
    assert!(text.contains("Reduce triangles to under 100"));
    assert!(!text.contains("Statistics"));
    Ok(())
}

#[test]
fn test_unwritable_destination_reports_error() -> Result<()> {
    let result = failing_result()?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("no_such_dir").join("report.json");

    let mut reporter = Reporter::new(ReportOptions::default());
    assert!(reporter.generate_report(&result, &path, ReportFormat::Html).is_err());

    let message = reporter.last_error().unwrap();
    assert!(message.contains("report.json"));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_overwrites_previous_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");
    std::fs::write(&path, "stale")?;

    let mut reporter = Reporter::new(ReportOptions::default());
    reporter.generate_report(&ValidationResult::new("empty.gltf"), &path, ReportFormat::Json)?;

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(doc["isValid"], true);
    assert_eq!(doc["issueSummary"]["total"], 0);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_non_utf8_scene_path_still_reports() -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let result = ValidationResult::new(OsStr::from_bytes(b"scene_\xff.gltf"));
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");

    let mut reporter = Reporter::new(ReportOptions::default());
    reporter.generate_report(&result, &path, ReportFormat::Json)?;
    assert!(reporter.last_error().is_none());

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(doc["filePath"], "scene_\u{FFFD}.gltf");

    let html = reporter.render(&result, ReportFormat::Html)?;
    assert!(html.contains("scene_\u{FFFD}.gltf"));
    Ok(())
}
