use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SowError;
use crate::types::{DiagnosticType, Status};

/// One inspected operational process. `name` is unique within a diagnostic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub add_to_engagement: bool,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
}

impl ProcessRecord {
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            status,
            ..Self::default()
        }
    }

    /// Warning/unable findings, or anything the user flagged for the engagement.
    pub fn is_actionable(&self) -> bool {
        self.status.needs_attention() || self.add_to_engagement
    }
}

/// A tool in the customer's stack, assessed alongside processes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub add_to_engagement: bool,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub description: String,
}

/// Customer-scoped diagnostic, keyed by `(customer_id, diagnostic_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub id: String,
    pub customer_id: String,
    pub diagnostic_type: DiagnosticType,
    #[serde(default)]
    pub processes: Vec<ProcessRecord>,
    #[serde(default)]
    pub tools: Vec<ToolRecord>,
    pub updated_at: DateTime<Utc>,
}

impl DiagnosticResult {
    pub fn new(
        id: impl Into<String>,
        customer_id: impl Into<String>,
        diagnostic_type: DiagnosticType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            diagnostic_type,
            processes: Vec::new(),
            tools: Vec::new(),
            updated_at: now,
        }
    }

    pub fn process(&self, name: &str) -> Option<&ProcessRecord> {
        self.processes.iter().find(|p| p.name == name)
    }

    /// Replace the process and tool sets with a re-import, in row order.
    ///
    /// Items missing from the import are dropped; nothing is merged by field.
    pub fn apply_import(
        &mut self,
        processes: Vec<ProcessRecord>,
        tools: Vec<ToolRecord>,
        now: DateTime<Utc>,
    ) {
        self.processes = processes;
        self.tools = tools;
        self.updated_at = now;
    }

    pub fn set_status(
        &mut self,
        name: &str,
        status: Status,
        now: DateTime<Utc>,
    ) -> Result<(), SowError> {
        let process = self.process_mut(name)?;
        process.status = status;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_priority(
        &mut self,
        name: &str,
        add_to_engagement: bool,
        now: DateTime<Utc>,
    ) -> Result<(), SowError> {
        let process = self.process_mut(name)?;
        process.add_to_engagement = add_to_engagement;
        self.updated_at = now;
        Ok(())
    }

    fn process_mut(&mut self, name: &str) -> Result<&mut ProcessRecord, SowError> {
        self.processes
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| SowError::ProcessNotFound(name.to_string()))
    }
}
