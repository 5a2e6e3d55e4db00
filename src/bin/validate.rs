// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Asset validation CLI

use anyhow::{Context, Result};
use asset_validator::io::load_gltf;
use asset_validator::report::{ReportFormat, ReportOptions, Reporter};
use asset_validator::validation::{ValidationConfig, Validator};
use clap::Parser;
use colored::Colorize;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "asset-validator")]
#[command(about = "Validate glTF/GLB assets against configurable rules", long_about = None)]
#[command(after_help = "Examples:\n  asset-validator model.gltf\n  asset-validator -c custom_config.json -o validation_report.json model.gltf\n  asset-validator -f html -o report.html model.gltf\n  asset-validator -f console model.gltf")]
struct Cli {
    /// Input scene (.gltf or .glb)
    input: PathBuf,

    /// Validation config file (JSON or TOML)
    #[arg(short, long, default_value = "validation_config.json")]
    config: PathBuf,

    /// Output report file
    #[arg(short, long, default_value = "report.json")]
    output: PathBuf,

    /// Report format: json, html, console
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Leave statistics out of the report
    #[arg(long)]
    no_stats: bool,

    /// Leave suggestions out of the report
    #[arg(long)]
    no_suggestions: bool,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and succeed; usage errors fail.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let format = ReportFormat::parse_or_json(&cli.format);

    if !cli.input.exists() {
        eprintln!(
            "{} Input file '{}' does not exist",
            "Error:".red().bold(),
            cli.input.display()
        );
        std::process::exit(1);
    }

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        ValidationConfig::load_from_file(&cli.config)
    } else {
        info!(
            "Using default configuration (config file '{}' not found)",
            cli.config.display()
        );
        ValidationConfig::default()
    };
    let validator = Validator::new(config).context("Invalid validation configuration")?;

    let scene = load_gltf(&cli.input)
        .with_context(|| format!("Error loading glTF file {}", cli.input.display()))?;

    info!("Validating asset...");
    let result = validator.validate(&scene);

    let mut reporter = Reporter::new(ReportOptions {
        verbose: cli.verbose,
        include_statistics: !cli.no_stats,
        include_suggestions: !cli.no_suggestions,
    });
    if format.writes_file() {
        info!("Generating report: {}", cli.output.display());
    }
    if reporter.generate_report(&result, &cli.output, format).is_err() {
        eprintln!(
            "{} Error generating report: {}",
            "Error:".red().bold(),
            reporter.last_error().unwrap_or("unknown error")
        );
        std::process::exit(1);
    }

    let total_issues = result.issue_count();
    if result.is_valid {
        let line = if total_issues > 0 {
            format!("✓ Validation PASSED with {} warnings/info messages", total_issues)
        } else {
            "✓ Validation PASSED".to_string()
        };
        println!("{}", line.green());
    } else {
        println!("{}", format!("✗ Validation FAILED with {} issues", total_issues).red());
    }

    if format.writes_file() {
        println!("Report saved to: {}", cli.output.display());
    }

    if !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}
