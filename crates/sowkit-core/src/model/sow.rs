use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::diagnostic::ProcessRecord;
use crate::types::DiagnosticType;

/// A priced scope line of a statement of work.
///
/// `diagnostic_items` names processes weakly: the referenced process may
/// have been renamed or removed since the section was generated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SowSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deliverables: Vec<String>,
    pub hours: Option<u32>,
    pub rate: Option<u32>,
    #[serde(default)]
    pub diagnostic_items: Vec<String>,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl SowSection {
    /// Hours times rate, when both are known.
    pub fn amount(&self) -> Option<u64> {
        match (self.hours, self.rate) {
            (Some(h), Some(r)) => Some(u64::from(h) * u64::from(r)),
            _ => None,
        }
    }
}

/// Frozen copy of a diagnostic's processes taken when the SOW was generated.
///
/// Fields are private: a snapshot is built by [`DiagnosticSnapshot::capture`]
/// and only ever replaced whole, via [`Sow::resync`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSnapshot {
    processes: Vec<ProcessRecord>,
    snapshot_at: DateTime<Utc>,
    #[serde(default)]
    fingerprint: String,
}

impl DiagnosticSnapshot {
    pub fn capture(processes: Vec<ProcessRecord>, at: DateTime<Utc>) -> Self {
        let fingerprint = fingerprint_processes(&processes);
        Self {
            processes,
            snapshot_at: at,
            fingerprint,
        }
    }

    pub fn processes(&self) -> &[ProcessRecord] {
        &self.processes
    }

    pub fn snapshot_at(&self) -> DateTime<Utc> {
        self.snapshot_at
    }

    /// Content hash of the process list at capture time. Empty for
    /// documents written before fingerprints existed.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Deterministic content hash of a process list, order-sensitive.
pub fn fingerprint_processes(processes: &[ProcessRecord]) -> String {
    let canonical = serde_json::to_string(processes).unwrap_or_default();
    format!("sha256:{:x}", Sha256::digest(canonical.as_bytes()))
}

/// Statement of work, optionally derived from a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sow {
    pub id: String,
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_type: Option<DiagnosticType>,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<SowSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic_snapshot: Option<DiagnosticSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sow {
    /// Replace the embedded snapshot with the current process list.
    ///
    /// All-or-nothing: the previous snapshot is discarded, never merged.
    pub fn resync(&mut self, current: &[ProcessRecord], now: DateTime<Utc>) {
        self.diagnostic_snapshot = Some(DiagnosticSnapshot::capture(current.to_vec(), now));
        self.updated_at = now;
    }
}
