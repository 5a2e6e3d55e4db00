// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON report: the serialized result plus an issue summary

use serde_json::{json, Value};

use super::{ReportError, ReportOptions};
use crate::validation::ValidationResult;

pub(super) fn render(result: &ValidationResult, options: &ReportOptions) -> Result<String, ReportError> {
    let mut report = serde_json::to_value(result)?;

    if let Value::Object(fields) = &mut report {
        if !options.include_statistics {
            fields.remove("statistics");
        }

        let summary = result.summary();
        fields.insert(
            "issueSummary".to_string(),
            json!({
                "info": summary.info,
                "warning": summary.warning,
                "error": summary.error,
                "critical": summary.critical,
                "total": summary.total(),
            }),
        );

        if !options.include_suggestions {
            strip_suggestions(fields.get_mut("globalIssues"));
            for key in ["meshResults", "materialResults"] {
                if let Some(Value::Array(entities)) = fields.get_mut(key) {
                    for entity in entities {
                        strip_suggestions(entity.get_mut("issues"));
                    }
                }
            }
        }
    }

    Ok(serde_json::to_string_pretty(&report)?)
}

fn strip_suggestions(issues: Option<&mut Value>) {
    if let Some(Value::Array(issues)) = issues {
        for issue in issues {
            if let Value::Object(fields) = issue {
                fields.remove("suggestion");
            }
        }
    }
}
