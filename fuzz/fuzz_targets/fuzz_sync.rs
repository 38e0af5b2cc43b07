#![no_main]
use libfuzzer_sys::fuzz_target;

use sowkit_core::model::ProcessRecord;
use sowkit_engine::sync::detect_sync;

fuzz_target!(|data: &[u8]| {
    let Ok((snapshot, current)) =
        serde_json::from_slice::<(Vec<ProcessRecord>, Vec<ProcessRecord>)>(data)
    else {
        return;
    };

    let report = detect_sync(&snapshot, &current);
    assert_eq!(
        report.total_changes,
        report.added.len() + report.removed.len() + report.status_changed.len()
    );
    assert_eq!(report.has_changes, report.total_changes > 0);
    assert!(!detect_sync(&current, &current).has_changes || has_duplicate_names(&current));
});

fn has_duplicate_names(processes: &[ProcessRecord]) -> bool {
    let mut names: Vec<&str> = processes.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.windows(2).any(|w| w[0] == w[1])
}
