use crate::model::ProcessRecord;
use crate::types::DiagnosticType;

const SEED_GTM: &str = include_str!("../seed/gtm.json");
const SEED_CLAY: &str = include_str!("../seed/clay.json");
const SEED_CPQ: &str = include_str!("../seed/cpq.json");

/// Built-in diagnostic types with a short description.
pub fn list_types() -> Vec<(&'static str, &'static str)> {
    vec![
        ("gtm", "Go-to-market process health across sales, marketing, and success"),
        ("clay", "Clay enrichment, automation, and CRM sync workflows"),
        ("cpq", "Configure-price-quote catalog, pricing, and order handoff"),
    ]
}

/// Fresh copy of the seed process checks for a diagnostic type.
///
/// Every check starts unassessed (`unable`) and unflagged.
pub fn processes(diagnostic_type: DiagnosticType) -> Vec<ProcessRecord> {
    let raw = match diagnostic_type {
        DiagnosticType::Gtm => SEED_GTM,
        DiagnosticType::Clay => SEED_CLAY,
        DiagnosticType::Cpq => SEED_CPQ,
    };
    // Embedded at compile time and covered by tests below.
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use std::collections::HashSet;

    #[test]
    fn every_seed_parses_with_unique_names() {
        for dt in DiagnosticType::ALL {
            let seed = processes(dt);
            assert!(!seed.is_empty(), "{dt} seed is empty");
            let names: HashSet<&str> = seed.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names.len(), seed.len(), "{dt} seed has duplicate names");
        }
    }

    #[test]
    fn seeds_start_unassessed() {
        for p in processes(DiagnosticType::Clay) {
            assert_eq!(p.status, Status::Unable);
            assert!(!p.add_to_engagement);
            assert!(p.service_id.is_some());
        }
    }

    #[test]
    fn list_types_covers_all() {
        let names: Vec<&str> = list_types().into_iter().map(|(n, _)| n).collect();
        for dt in DiagnosticType::ALL {
            assert!(names.contains(&dt.as_str()));
        }
    }
}
