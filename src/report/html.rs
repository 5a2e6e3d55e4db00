// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Self-contained HTML report

use chrono::Local;

use super::{group_by_severity, ReportOptions};
use crate::validation::{
    MaterialValidationResult, MeshValidationResult, Severity, ValidationIssue, ValidationResult,
};

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
h1 { margin-bottom: 0.2rem; }
.meta { color: #666; margin-bottom: 1.5rem; }
.status { padding: 0.8rem 1rem; border-radius: 4px; font-weight: bold; color: #fff; }
.status.passed { background: #28a745; }
.status.failed { background: #dc3545; }
table { border-collapse: collapse; margin: 0.8rem 0 1.5rem; min-width: 60%; }
th, td { border: 1px solid #ddd; padding: 0.4rem 0.7rem; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
.severity { font-weight: bold; white-space: nowrap; }
.suggestion { color: #555; font-style: italic; }
"#;

pub(super) fn render(result: &ValidationResult, options: &ReportOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Asset Validation Report - {}</title>\n",
        escape_html(&result.file_path.display().to_string())
    ));
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));

    html.push_str("<h1>Asset Validation Report</h1>\n");
    html.push_str(&format!(
        "<div class=\"meta\">File: <code>{}</code><br>Generated: {}</div>\n",
        escape_html(&result.file_path.display().to_string()),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    let summary = result.summary();
    if result.is_valid {
        html.push_str(&format!(
            "<div class=\"status passed\">✓ PASSED ({} issues)</div>\n",
            summary.total()
        ));
    } else {
        html.push_str(&format!(
            "<div class=\"status failed\">✗ FAILED ({} issues)</div>\n",
            summary.total()
        ));
    }

    if options.include_statistics {
        let stats = &result.statistics;
        html.push_str("<h2>Statistics</h2>\n<table>\n");
        for (label, value) in [
            ("Meshes", stats.total_meshes),
            ("Materials", stats.total_materials),
            ("Textures", stats.total_textures),
            ("Vertices", stats.total_vertices),
            ("Triangles", stats.total_triangles),
        ] {
            html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", label, value));
        }
        html.push_str("</table>\n");
    }

    html.push_str("<h2>Issue Summary</h2>\n<table>\n");
    for severity in Severity::DESCENDING {
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            severity_badge(severity),
            summary.count(severity)
        ));
    }
    html.push_str("</table>\n");

    if !result.global_issues.is_empty() {
        html.push_str("<h2>Scene Issues</h2>\n");
        html.push_str(&issue_table(&result.global_issues, options));
    }

    mesh_details(&mut html, &result.mesh_results, options);
    material_details(&mut html, &result.material_results, options);

    html.push_str("</body>\n</html>\n");
    html
}

fn mesh_details(html: &mut String, meshes: &[MeshValidationResult], options: &ReportOptions) {
    if meshes.is_empty() {
        return;
    }

    html.push_str("<h2>Meshes</h2>\n<table>\n");
    html.push_str("<tr><th>Name</th><th>Vertices</th><th>Triangles</th><th>Materials</th><th>Valid UVs</th><th>Issues</th></tr>\n");
    for mesh in meshes {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&mesh.name),
            mesh.vertex_count,
            mesh.triangle_count,
            mesh.material_count,
            if mesh.has_valid_uvs { "yes" } else { "no" },
            mesh.issues.len()
        ));
    }
    html.push_str("</table>\n");

    for mesh in meshes.iter().filter(|m| !m.issues.is_empty()) {
        html.push_str(&format!("<h3>Mesh: {}</h3>\n", escape_html(&mesh.name)));
        html.push_str(&issue_table(&mesh.issues, options));
    }
}

fn material_details(html: &mut String, materials: &[MaterialValidationResult], options: &ReportOptions) {
    if materials.is_empty() {
        return;
    }

    html.push_str("<h2>Materials</h2>\n<table>\n");
    html.push_str("<tr><th>Name</th><th>Textures</th><th>Valid Textures</th><th>Issues</th></tr>\n");
    for material in materials {
        // Texture names only in verbose reports; otherwise just the count.
        let textures = if options.verbose {
            let names: Vec<String> = material.textures.iter().map(|t| escape_html(t)).collect();
            names.join("<br>")
        } else {
            material.textures.len().to_string()
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&material.name),
            textures,
            if material.has_valid_textures { "yes" } else { "no" },
            material.issues.len()
        ));
    }
    html.push_str("</table>\n");

    for material in materials.iter().filter(|m| !m.issues.is_empty()) {
        html.push_str(&format!("<h3>Material: {}</h3>\n", escape_html(&material.name)));
        html.push_str(&issue_table(&material.issues, options));
    }
}

fn issue_table(issues: &[ValidationIssue], options: &ReportOptions) -> String {
    let mut table = String::from("<table>\n");
    table.push_str("<tr><th>Severity</th><th>Category</th><th>Location</th><th>Message</th>");
    if options.include_suggestions {
        table.push_str("<th>Suggestion</th>");
    }
    table.push_str("</tr>\n");

    for (severity, bucket) in group_by_severity(issues) {
        for issue in bucket {
            table.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                severity_badge(severity),
                escape_html(&issue.category),
                escape_html(&issue.location),
                escape_html(&issue.message)
            ));
            if options.include_suggestions {
                table.push_str(&format!(
                    "<td class=\"suggestion\">{}</td>",
                    issue.suggestion.as_deref().map(escape_html).unwrap_or_default()
                ));
            }
            table.push_str("</tr>\n");
        }
    }

    table.push_str("</table>\n");
    table
}

fn severity_badge(severity: Severity) -> String {
    format!(
        "<span class=\"severity\" style=\"color: {}\">{} {}</span>",
        severity_color(severity),
        severity_icon(severity),
        severity.as_str()
    )
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "#17a2b8",
        Severity::Warning => "#d39e00",
        Severity::Error => "#dc3545",
        Severity::Critical => "#6f42c1",
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

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
