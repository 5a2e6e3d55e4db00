// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Report generation for validation results
//!
//! Three renderers share one set of options: JSON (machine readable), HTML
//! (self-contained page) and console (colored text on stdout). File reports
//! are written through a temporary file in the destination directory and
//! renamed into place.

mod console;
mod html;
mod json;

use log::warn;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::validation::{Severity, ValidationIssue, ValidationResult};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown report format '{0}'")]
    UnknownFormat(String),
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Html,
    Console,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Console => "console",
        }
    }

    /// Parse a format name, falling back to JSON with a warning
    pub fn parse_or_json(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Unknown report format '{}', using JSON", name);
            ReportFormat::Json
        })
    }

    /// Whether this format is written to a file
    pub fn writes_file(&self) -> bool {
        !matches!(self, ReportFormat::Console)
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "html" => Ok(ReportFormat::Html),
            "console" => Ok(ReportFormat::Console),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Expand clean entities and material texture lists in HTML and console output
    pub verbose: bool,
    pub include_statistics: bool,
    pub include_suggestions: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            include_statistics: true,
            include_suggestions: true,
        }
    }
}

/// Renders validation results and remembers the last failure
#[derive(Debug, Default)]
pub struct Reporter {
    options: ReportOptions,
    last_error: Option<String>,
}

impl Reporter {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            last_error: None,
        }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Message of the most recent failed `generate_report` call
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Render the result to a string without touching the filesystem
    pub fn render(&self, result: &ValidationResult, format: ReportFormat) -> Result<String, ReportError> {
        match format {
            ReportFormat::Json => json::render(result, &self.options),
            ReportFormat::Html => Ok(html::render(result, &self.options)),
            ReportFormat::Console => Ok(console::render(result, &self.options)),
        }
    }

    /// Write a report. Console output goes to stdout and ignores `destination`.
    pub fn generate_report(
        &mut self,
        result: &ValidationResult,
        destination: impl AsRef<Path>,
        format: ReportFormat,
    ) -> Result<(), ReportError> {
        let outcome = self.write_report(result, destination.as_ref(), format);
        self.last_error = outcome.as_ref().err().map(ToString::to_string);
        outcome
    }

    fn write_report(
        &self,
        result: &ValidationResult,
        destination: &Path,
        format: ReportFormat,
    ) -> Result<(), ReportError> {
        let content = self.render(result, format)?;
        if format.writes_file() {
            write_atomically(destination, &content)
        } else {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .and_then(|_| handle.flush())
                .map_err(|source| ReportError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}

/// Replace `path` with `content` via a temporary file in the same directory
fn write_atomically(path: &Path, content: &str) -> Result<(), ReportError> {
    let to_error = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(to_error)?;
    file.write_all(content.as_bytes()).map_err(to_error)?;
    file.persist(path).map_err(|e| to_error(e.error))?;
    Ok(())
}

/// Issues bucketed from most to least severe; empty buckets are skipped
pub(crate) fn group_by_severity(issues: &[ValidationIssue]) -> Vec<(Severity, Vec<&ValidationIssue>)> {
    Severity::DESCENDING
        .iter()
        .map(|&severity| {
            let bucket: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
            (severity, bucket)
        })
        .filter(|(_, bucket)| !bucket.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::parse_or_json("pdf"), ReportFormat::Json);
        assert_eq!(ReportFormat::parse_or_json("console"), ReportFormat::Console);
    }

    #[test]
    fn test_grouping_order() {
        let issues = vec![
            ValidationIssue::new(Severity::Info, "geometry", "a", "m"),
            ValidationIssue::new(Severity::Critical, "geometry", "b", "m"),
            ValidationIssue::new(Severity::Info, "geometry", "c", "m"),
        ];
        let groups = group_by_severity(&issues);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Severity::Critical);
        assert_eq!(groups[1].1.len(), 2);
    }

    #[test]
    fn test_last_error_tracks_latest_write() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("report.json");
        let mut reporter = Reporter::new(ReportOptions::default());

        let result = ValidationResult::new("scene.gltf");
        assert!(reporter.generate_report(&result, &target, ReportFormat::Json).is_err());
        assert!(reporter.last_error().is_some());

        let target = dir.path().join("report.json");
        std::fs::write(&target, "previous").unwrap();
        reporter.generate_report(&result, &target, ReportFormat::Json).unwrap();
        assert!(reporter.last_error().is_none());
        assert_ne!(std::fs::read_to_string(&target).unwrap(), "previous");
    }
}
