#![no_main]
use libfuzzer_sys::fuzz_target;

use sowkit_core::model::{Catalog, ProcessRecord};
use sowkit_engine::scoring::{health_summary, sort_by_priority};
use sowkit_engine::sections::{generate_sections_from_diagnostic, sow_totals};

fuzz_target!(|data: &[u8]| {
    let parsed = serde_json::from_slice::<(Vec<ProcessRecord>, Catalog)>(data);
    let Ok((processes, catalog)) = parsed else {
        return;
    };

    let summary = health_summary(&processes);
    assert!(summary.score <= 100);
    assert_eq!(sort_by_priority(&processes).len(), processes.len());

    let sections = generate_sections_from_diagnostic(&processes, &catalog);
    assert_eq!(sections, generate_sections_from_diagnostic(&processes, &catalog));
    let _ = sow_totals(&sections);
});
