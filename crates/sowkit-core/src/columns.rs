//! Per-diagnostic-type column maps for the markdown table format.
//!
//! Header cells are matched after normalization to `snake_case`; see
//! [`normalize_header`].

use crate::types::DiagnosticType;

/// Internal record field a table column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Status,
    AddToEngagement,
    Function,
    Outcome,
    Metric,
    Description,
    ServiceId,
}

/// Which record set a table populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Processes,
    Tools,
}

pub struct ColumnMap {
    /// Aliases specific to this diagnostic type, checked before the shared ones.
    extra_process_aliases: &'static [(&'static str, Field)],
    /// Canonical headers, in render order.
    process_headers: &'static [(&'static str, Field)],
}

const PROCESS_ALIASES: &[(&str, Field)] = &[
    ("process", Field::Name),
    ("name", Field::Name),
    ("status", Field::Status),
    ("health", Field::Status),
    ("include", Field::AddToEngagement),
    ("priority", Field::AddToEngagement),
    ("add_to_engagement", Field::AddToEngagement),
    ("function", Field::Function),
    ("category", Field::Function),
    ("outcome", Field::Outcome),
    ("business_outcome", Field::Outcome),
    ("metric", Field::Metric),
    ("kpi", Field::Metric),
    ("description", Field::Description),
    ("notes", Field::Description),
    ("service_id", Field::ServiceId),
    ("service", Field::ServiceId),
];

const TOOL_ALIASES: &[(&str, Field)] = &[
    ("tool", Field::Name),
    ("name", Field::Name),
    ("status", Field::Status),
    ("include", Field::AddToEngagement),
    ("priority", Field::AddToEngagement),
    ("category", Field::Function),
    ("function", Field::Function),
    ("description", Field::Description),
    ("notes", Field::Description),
];

const TOOL_HEADERS: &[(&str, Field)] = &[
    ("Tool", Field::Name),
    ("Status", Field::Status),
    ("Include", Field::AddToEngagement),
    ("Category", Field::Function),
    ("Description", Field::Description),
];

static GTM: ColumnMap = ColumnMap {
    extra_process_aliases: &[("stage", Field::Function)],
    process_headers: &[
        ("Process", Field::Name),
        ("Status", Field::Status),
        ("Include", Field::AddToEngagement),
        ("Function", Field::Function),
        ("Outcome", Field::Outcome),
        ("Metric", Field::Metric),
        ("Description", Field::Description),
        ("Service ID", Field::ServiceId),
    ],
};

static CLAY: ColumnMap = ColumnMap {
    extra_process_aliases: &[("workflow", Field::Name)],
    process_headers: &[
        ("Process", Field::Name),
        ("Status", Field::Status),
        ("Include", Field::AddToEngagement),
        ("Category", Field::Function),
        ("Outcome", Field::Outcome),
        ("Metric", Field::Metric),
        ("Description", Field::Description),
        ("Service ID", Field::ServiceId),
    ],
};

static CPQ: ColumnMap = ColumnMap {
    extra_process_aliases: &[("area", Field::Function)],
    process_headers: &[
        ("Process", Field::Name),
        ("Status", Field::Status),
        ("Include", Field::AddToEngagement),
        ("Area", Field::Function),
        ("Outcome", Field::Outcome),
        ("Metric", Field::Metric),
        ("Description", Field::Description),
        ("Service ID", Field::ServiceId),
    ],
};

pub fn column_map(diagnostic_type: DiagnosticType) -> &'static ColumnMap {
    match diagnostic_type {
        DiagnosticType::Gtm => &GTM,
        DiagnosticType::Clay => &CLAY,
        DiagnosticType::Cpq => &CPQ,
    }
}

impl ColumnMap {
    /// Resolve a normalized header to a field. Unmapped headers yield `None`.
    pub fn resolve(&self, kind: TableKind, header: &str) -> Option<Field> {
        let lookup = |aliases: &[(&str, Field)]| {
            aliases
                .iter()
                .find(|(alias, _)| *alias == header)
                .map(|(_, field)| *field)
        };
        match kind {
            TableKind::Processes => {
                lookup(self.extra_process_aliases).or_else(|| lookup(PROCESS_ALIASES))
            }
            TableKind::Tools => lookup(TOOL_ALIASES),
        }
    }

    /// Display headers used when rendering a table of this kind.
    pub fn headers(&self, kind: TableKind) -> &'static [(&'static str, Field)] {
        match kind {
            TableKind::Processes => self.process_headers,
            TableKind::Tools => TOOL_HEADERS,
        }
    }
}

/// Lower-case a header cell and collapse non-alphanumeric runs to `_`.
pub fn normalize_header(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut pending_sep = false;
    for ch in cell.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_header(" Service ID "), "service_id");
        assert_eq!(normalize_header("Include?"), "include");
        assert_eq!(normalize_header("Business -- Outcome"), "business_outcome");
        assert_eq!(normalize_header("__KPI__"), "kpi");
    }

    #[test]
    fn every_render_header_resolves_to_its_field() {
        for dt in DiagnosticType::ALL {
            let map = column_map(dt);
            for kind in [TableKind::Processes, TableKind::Tools] {
                for (header, field) in map.headers(kind) {
                    assert_eq!(
                        map.resolve(kind, &normalize_header(header)),
                        Some(*field),
                        "{dt} {header}"
                    );
                }
            }
        }
    }

    #[test]
    fn type_specific_aliases() {
        assert_eq!(
            column_map(DiagnosticType::Cpq).resolve(TableKind::Processes, "area"),
            Some(Field::Function)
        );
        assert_eq!(
            column_map(DiagnosticType::Gtm).resolve(TableKind::Processes, "area"),
            None
        );
        assert_eq!(
            column_map(DiagnosticType::Clay).resolve(TableKind::Tools, "service_id"),
            None
        );
    }
}
