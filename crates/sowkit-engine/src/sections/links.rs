use serde::Serialize;

use sowkit_core::model::{ProcessRecord, SowSection};

/// A section's `diagnostic_items` resolved against a live process list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLinks<'a> {
    pub linked: Vec<&'a ProcessRecord>,
    /// Names that no longer match any process.
    pub missing: Vec<String>,
}

/// Resolve weak name references. Missing names are reported, never an error.
pub fn link_section_items<'a>(
    section: &SowSection,
    processes: &'a [ProcessRecord],
) -> SectionLinks<'a> {
    let mut links = SectionLinks {
        linked: Vec::new(),
        missing: Vec::new(),
    };
    for name in &section.diagnostic_items {
        match processes.iter().find(|p| &p.name == name) {
            Some(p) => links.linked.push(p),
            None => links.missing.push(name.clone()),
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use sowkit_core::types::Status;

    #[test]
    fn missing_references_degrade_gracefully() {
        let section = SowSection {
            id: "s1".into(),
            title: "Sales".into(),
            diagnostic_items: vec!["Lead routing".into(), "Retired process".into()],
            ..SowSection::default()
        };
        let processes = vec![
            ProcessRecord::new("Lead routing", Status::Warning),
            ProcessRecord::new("Forecasting", Status::Healthy),
        ];
        let links = link_section_items(&section, &processes);
        assert_eq!(links.linked.len(), 1);
        assert_eq!(links.linked[0].name, "Lead routing");
        assert_eq!(links.missing, vec!["Retired process"]);
    }

    #[test]
    fn empty_process_list_marks_everything_missing() {
        let section = SowSection {
            diagnostic_items: vec!["A".into()],
            ..SowSection::default()
        };
        let links = link_section_items(&section, &[]);
        assert!(links.linked.is_empty());
        assert_eq!(links.missing, vec!["A"]);
    }
}
