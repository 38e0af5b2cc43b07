#![no_main]
use libfuzzer_sys::fuzz_target;

use sowkit_core::types::DiagnosticType;
use sowkit_engine::ingest::{parse_diagnostic_markdown, render_markdown};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for dt in DiagnosticType::ALL {
            let parsed = parse_diagnostic_markdown(text, dt);
            assert!(parsed
                .processes
                .iter()
                .all(|p| !p.name.is_empty() && p.status.is_canonical()));

            // Cell cleanup can merge names, never invent them.
            let rendered = render_markdown(dt, &parsed.processes, &parsed.tools);
            let again = parse_diagnostic_markdown(&rendered, dt);
            assert!(again.processes.len() <= parsed.processes.len());
        }
    }
});
