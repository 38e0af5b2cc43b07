use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use sowkit_core::model::{fingerprint_processes, ProcessRecord, Sow};
use sowkit_core::types::Status;

/// A process present on both sides whose status moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub name: String,
    pub previous_status: Status,
    pub current_status: Status,
}

/// Drift between a SOW's frozen snapshot and the live diagnostic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// New actionable processes, in current order.
    pub added: Vec<ProcessRecord>,
    /// Snapshot names missing from current, in snapshot order.
    pub removed: Vec<String>,
    pub status_changed: Vec<StatusChange>,
    pub has_changes: bool,
    pub total_changes: usize,
}

impl SyncReport {
    fn finish(mut self) -> Self {
        self.total_changes = self.added.len() + self.removed.len() + self.status_changed.len();
        self.has_changes = self.total_changes > 0;
        self
    }
}

/// Diff a snapshot against the current process list.
///
/// Only actionable newcomers count as added: a new healthy process is not
/// drift the SOW needs to react to.
pub fn detect_sync(snapshot: &[ProcessRecord], current: &[ProcessRecord]) -> SyncReport {
    let before: HashMap<&str, &ProcessRecord> =
        snapshot.iter().map(|p| (p.name.as_str(), p)).collect();
    let after: HashMap<&str, &ProcessRecord> =
        current.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut report = SyncReport::default();

    for p in current {
        match before.get(p.name.as_str()) {
            None if p.is_actionable() => report.added.push(p.clone()),
            None => {}
            Some(prev) if prev.status != p.status => report.status_changed.push(StatusChange {
                name: p.name.clone(),
                previous_status: prev.status.clone(),
                current_status: p.status.clone(),
            }),
            Some(_) => {}
        }
    }

    report.removed = snapshot
        .iter()
        .filter(|p| !after.contains_key(p.name.as_str()))
        .map(|p| p.name.clone())
        .collect();

    let report = report.finish();
    debug!(
        added = report.added.len(),
        removed = report.removed.len(),
        status_changed = report.status_changed.len(),
        "sync detection"
    );
    report
}

/// Sync detection over a SOW's embedded snapshot.
pub trait SnapshotDrift {
    /// `None` when there is no snapshot to compare against.
    fn sync_report(&self, current: &[ProcessRecord]) -> Option<SyncReport>;
}

impl SnapshotDrift for Sow {
    fn sync_report(&self, current: &[ProcessRecord]) -> Option<SyncReport> {
        let snapshot = self.diagnostic_snapshot.as_ref()?;
        let stored = snapshot.fingerprint();
        // The stored hash is only trusted while it still describes the stored processes.
        if !stored.is_empty() && stored == fingerprint_processes(snapshot.processes()) {
            if stored == fingerprint_processes(current) {
                return Some(SyncReport::default());
            }
        } else if !stored.is_empty() {
            debug!(sow = %self.id, "snapshot fingerprint is stale; running full diff");
        }
        Some(detect_sync(snapshot.processes(), current))
    }
}

/// Replace the SOW's snapshot with `current`. Afterwards the report is clean.
pub fn resync(sow: &mut Sow, current: &[ProcessRecord], now: DateTime<Utc>) {
    let previous = sow
        .diagnostic_snapshot
        .as_ref()
        .map(|s| s.processes().len())
        .unwrap_or(0);
    sow.resync(current, now);
    info!(sow = %sow.id, previous, current = current.len(), "resynced diagnostic snapshot");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sowkit_core::model::DiagnosticSnapshot;

    fn records(value: serde_json::Value) -> Vec<ProcessRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn sow_with(snapshot: Option<Vec<ProcessRecord>>) -> Sow {
        let now = Utc::now();
        Sow {
            id: "sow-1".into(),
            customer_id: "acme".into(),
            diagnostic_type: None,
            title: "Remediation".into(),
            sections: vec![],
            diagnostic_snapshot: snapshot.map(|p| DiagnosticSnapshot::capture(p, now)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_change_and_actionable_addition() {
        let snapshot = records(json!([{"name": "A", "status": "healthy"}]));
        let current = records(json!([
            {"name": "A", "status": "warning"},
            {"name": "B", "status": "unable", "addToEngagement": true}
        ]));
        let report = detect_sync(&snapshot, &current);
        assert_eq!(
            report.status_changed,
            vec![StatusChange {
                name: "A".into(),
                previous_status: Status::Healthy,
                current_status: Status::Warning,
            }]
        );
        assert_eq!(report.added.len(), 1);
        assert_eq!(report.added[0].name, "B");
        assert!(report.removed.is_empty());
        assert_eq!(report.total_changes, 2);
        assert!(report.has_changes);
    }

    #[test]
    fn new_healthy_process_is_not_drift() {
        let snapshot = records(json!([{"name": "A", "status": "healthy"}]));
        let current = records(json!([
            {"name": "A", "status": "healthy"},
            {"name": "C", "status": "healthy"}
        ]));
        let report = detect_sync(&snapshot, &current);
        assert!(!report.has_changes);
        assert_eq!(report.total_changes, 0);
    }

    #[test]
    fn removals_follow_snapshot_order() {
        let snapshot = records(json!([
            {"name": "Z", "status": "warning"},
            {"name": "A", "status": "healthy"},
            {"name": "M", "status": "careful"}
        ]));
        let current = records(json!([{"name": "A", "status": "healthy"}]));
        let report = detect_sync(&snapshot, &current);
        assert_eq!(report.removed, vec!["Z", "M"]);
        assert_eq!(report.total_changes, 2);
    }

    #[test]
    fn report_serializes_camel_case() {
        let snapshot = records(json!([{"name": "A", "status": "healthy"}]));
        let current = records(json!([{"name": "A", "status": "unable"}]));
        let value = serde_json::to_value(detect_sync(&snapshot, &current)).unwrap();
        assert_eq!(value["statusChanged"][0]["previousStatus"], "healthy");
        assert_eq!(value["statusChanged"][0]["currentStatus"], "unable");
        assert_eq!(value["hasChanges"], true);
        assert_eq!(value["totalChanges"], 1);
    }

    #[test]
    fn sow_without_snapshot_has_no_report() {
        let sow = sow_with(None);
        assert!(sow.sync_report(&[]).is_none());
    }

    #[test]
    fn unchanged_fingerprint_short_circuits() {
        let processes = records(json!([{"name": "A", "status": "warning"}]));
        let sow = sow_with(Some(processes.clone()));
        let report = sow.sync_report(&processes).unwrap();
        assert!(!report.has_changes);
    }

    #[test]
    fn stale_fingerprint_does_not_hide_drift() {
        let snapshot = records(json!([{"name": "A", "status": "healthy"}]));
        let current = records(json!([{"name": "A", "status": "warning"}]));

        // Snapshot content edited after capture, fingerprint left behind.
        let mut value = serde_json::to_value(sow_with(Some(snapshot))).unwrap();
        value["diagnosticSnapshot"]["fingerprint"] = fingerprint_processes(&current).into();
        let sow: Sow = serde_json::from_value(value).unwrap();

        let report = sow.sync_report(&current).unwrap();
        assert_eq!(report.total_changes, 1);
        assert_eq!(report.status_changed[0].previous_status, Status::Healthy);
        assert_eq!(report.status_changed[0].current_status, Status::Warning);
    }

    #[test]
    fn resync_clears_drift() {
        let mut sow = sow_with(Some(records(json!([{"name": "A", "status": "healthy"}]))));
        let current = records(json!([
            {"name": "A", "status": "warning"},
            {"name": "B", "status": "unable"}
        ]));
        assert!(sow.sync_report(&current).unwrap().has_changes);

        resync(&mut sow, &current, Utc::now());
        let report = sow.sync_report(&current).unwrap();
        assert!(!report.has_changes);
        assert_eq!(
            sow.diagnostic_snapshot.as_ref().unwrap().processes(),
            current.as_slice()
        );
    }
}
