// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Colored terminal report

use colored::{ColoredString, Colorize};

use super::{group_by_severity, ReportOptions};
use crate::validation::{Severity, ValidationIssue, ValidationResult};

pub(super) fn render(result: &ValidationResult, options: &ReportOptions) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "═".repeat(80).white()));
    out.push_str(&format!("{}\n", "Asset Validation Report".bold()));
    out.push_str(&format!("{}\n", "═".repeat(80).white()));
    out.push_str(&format!(
        "  {} {}\n",
        "File:".white(),
        result.file_path.display().to_string().cyan()
    ));

    let summary = result.summary();
    let status = if result.is_valid {
        "PASSED".green().bold()
    } else {
        "FAILED".red().bold()
    };
    out.push_str(&format!("  {} {}\n", "Status:".white(), status));

    if options.include_statistics {
        let stats = &result.statistics;
        out.push_str(&format!("\n{}\n", "Statistics".bold()));
        out.push_str(&format!("{}\n", "─".repeat(80).white()));
        for (label, value) in [
            ("Meshes:", stats.total_meshes),
            ("Materials:", stats.total_materials),
            ("Textures:", stats.total_textures),
            ("Vertices:", stats.total_vertices),
            ("Triangles:", stats.total_triangles),
        ] {
            out.push_str(&format!("  {:<12} {}\n", label.white(), value.to_string().cyan()));
        }
    }

    out.push_str(&format!("\n{}\n", "Issues".bold()));
    out.push_str(&format!("{}\n", "─".repeat(80).white()));
    for severity in Severity::DESCENDING {
        out.push_str(&format!(
            "  {:<12} {}\n",
            colorize(severity, severity.as_str()),
            summary.count(severity)
        ));
    }

    if !result.global_issues.is_empty() {
        out.push_str(&format!("\n{}\n", "Scene".bold()));
        push_issues(&mut out, &result.global_issues, options);
    }

    for mesh in &result.mesh_results {
        out.push_str(&format!(
            "\n{} {} ({} vertices, {} triangles, UVs {})\n",
            "Mesh:".bold(),
            mesh.name.cyan(),
            mesh.vertex_count,
            mesh.triangle_count,
            if mesh.has_valid_uvs { "valid".green() } else { "invalid".yellow() }
        ));
        push_issues(&mut out, &mesh.issues, options);
    }

    for material in &result.material_results {
        out.push_str(&format!(
            "\n{} {} ({} textures)\n",
            "Material:".bold(),
            material.name.cyan(),
            material.textures.len()
        ));
        if options.verbose {
            for texture in &material.textures {
                out.push_str(&format!("    {}\n", texture.white()));
            }
        }
        push_issues(&mut out, &material.issues, options);
    }

    out.push_str(&format!("{}\n", "═".repeat(80).white()));
    out
}

fn push_issues(out: &mut String, issues: &[ValidationIssue], options: &ReportOptions) {
    if issues.is_empty() {
        if options.verbose {
            out.push_str(&format!("  {} no issues\n", "✓".green()));
        }
        return;
    }

    for (severity, bucket) in group_by_severity(issues) {
        for issue in bucket {
            out.push_str(&format!(
                "  {} [{}] {} @ {}: {}\n",
                colorize(severity, severity_icon(severity)),
                colorize(severity, severity.as_str()),
                issue.category,
                issue.location.cyan(),
                issue.message
            ));
            if options.include_suggestions {
                if let Some(suggestion) = &issue.suggestion {
                    out.push_str(&format!("      {} {}\n", "→".white(), suggestion.bright_black()));
                }
            }
        }
    }
}

fn colorize(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Info => text.blue(),
        Severity::Warning => text.yellow(),
        Severity::Error => text.red(),
        Severity::Critical => text.magenta().bold(),
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ",
        Severity::Warning => "⚠",
        Severity::Error => "✗",
        Severity::Critical => "‼",
    }
}
