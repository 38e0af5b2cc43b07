#[derive(Debug, thiserror::Error)]
pub enum SowError {
    #[error("process not found: {0}")]
    ProcessNotFound(String),
    #[error("unknown diagnostic type: {0} (expected gtm, clay, or cpq)")]
    UnknownDiagnosticType(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Structured validation result for `sow validate --json`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckReport {
    pub file: String,
    pub kind: String,
    pub pass: bool,
    pub errors: Vec<CheckIssue>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}
