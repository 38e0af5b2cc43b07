use anyhow::{bail, Context, Result};
use jsonschema::Validator;
use serde_json::Value;

use crate::errors::{CheckIssue, CheckReport};

const SCHEMA_DIAGNOSTIC: &str = include_str!("../schema/diagnostic.schema.json");
const SCHEMA_SOW: &str = include_str!("../schema/sow.schema.json");

/// Document kinds with an embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Diagnostic,
    Sow,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Diagnostic => "diagnostic",
            DocumentKind::Sow => "sow",
        }
    }
}

/// Guess the document kind: SOWs carry a title or sections.
pub fn detect_kind(data: &Value) -> DocumentKind {
    if data.get("sections").is_some() || data.get("title").is_some() {
        DocumentKind::Sow
    } else {
        DocumentKind::Diagnostic
    }
}

pub fn validator_for(kind: DocumentKind) -> Result<Validator> {
    let schema_str = match kind {
        DocumentKind::Diagnostic => SCHEMA_DIAGNOSTIC,
        DocumentKind::Sow => SCHEMA_SOW,
    };
    let schema: Value =
        serde_json::from_str(schema_str).context("embedded schema is invalid JSON")?;
    Validator::new(&schema).map_err(|e| anyhow::anyhow!("schema compilation failed: {e}"))
}

/// Validate a single document (auto-detect kind).
pub fn validate(data: &Value) -> Result<()> {
    let v = validator_for(detect_kind(data))?;
    if v.is_valid(data) {
        return Ok(());
    }
    let msgs: Vec<String> = v
        .iter_errors(data)
        .map(|error| format!("  {}: {error}", location(&error.instance_path.to_string())))
        .collect();
    bail!("validation failed:\n{}", msgs.join("\n"));
}

/// Structured check of one document for `sow validate --json`.
pub fn check(data: &Value, file: &str) -> Result<CheckReport> {
    let kind = detect_kind(data);
    let v = validator_for(kind)?;
    let errors: Vec<CheckIssue> = v
        .iter_errors(data)
        .map(|error| CheckIssue {
            message: error.to_string(),
            path: Some(location(&error.instance_path.to_string())),
        })
        .collect();
    Ok(CheckReport {
        file: file.to_string(),
        kind: kind.as_str().to_string(),
        pass: errors.is_empty(),
        errors,
    })
}

/// Check multiple files. Unreadable or non-JSON files fail their own report.
pub fn check_files(paths: &[String]) -> Result<Vec<CheckReport>> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let parsed = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {path}"))
            .and_then(|c| {
                serde_json::from_str::<Value>(&c).with_context(|| format!("{path}: invalid JSON"))
            });
        match parsed {
            Ok(data) => reports.push(check(&data, path)?),
            Err(e) => reports.push(CheckReport {
                file: path.clone(),
                kind: "unknown".to_string(),
                pass: false,
                errors: vec![CheckIssue {
                    message: format!("{e:#}"),
                    path: None,
                }],
            }),
        }
    }
    Ok(reports)
}

fn location(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}
