use sowkit_core::columns::{column_map, Field, TableKind};
use sowkit_core::model::{ProcessRecord, ToolRecord};
use sowkit_core::types::{DiagnosticType, Status};

/// Render records back into the import format using the type's column map.
///
/// Re-parsing the output yields the same records for well-formed input.
pub fn render_markdown(
    diagnostic_type: DiagnosticType,
    processes: &[ProcessRecord],
    tools: &[ToolRecord],
) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&format!("# {} Diagnostic\n\n", diagnostic_type.label()));
    emit_processes(&mut out, diagnostic_type, processes);
    emit_tools(&mut out, diagnostic_type, tools);
    out
}

/// Blank import template: one example row per table plus editing notes.
pub fn template(diagnostic_type: DiagnosticType) -> String {
    let example_process = ProcessRecord {
        name: "Example process".to_string(),
        status: Status::Warning,
        add_to_engagement: true,
        function: "Example function".to_string(),
        outcome: "Example outcome".to_string(),
        metric: "Example metric".to_string(),
        description: "Replace this row with your processes".to_string(),
        service_id: None,
    };
    let example_tool = ToolRecord {
        name: "Example tool".to_string(),
        status: Status::Healthy,
        add_to_engagement: false,
        function: "Example category".to_string(),
        description: "Replace this row with your tools".to_string(),
    };

    let mut out = String::with_capacity(2048);
    out.push_str(&format!(
        "# {} Diagnostic Import Template\n\n",
        diagnostic_type.label()
    ));
    emit_processes(&mut out, diagnostic_type, &[example_process]);
    emit_tools(&mut out, diagnostic_type, &[example_tool]);

    out.push_str("## Status Legend\n\n");
    out.push_str("- **healthy**: working as intended\n");
    out.push_str("- **careful**: works, with gaps worth watching\n");
    out.push_str("- **warning**: unreliable or broken, needs remediation\n");
    out.push_str("- **unable**: could not be assessed\n\n");

    out.push_str("## How to Edit\n\n");
    out.push_str("1. Keep the header rows as they are.\n");
    out.push_str("2. Add one row per process or tool; names must be unique.\n");
    out.push_str("3. Use a status from the legend above.\n");
    out.push_str("4. Mark Include with ✓ to add the row to the engagement.\n");
    out
}

fn emit_processes(out: &mut String, diagnostic_type: DiagnosticType, processes: &[ProcessRecord]) {
    let headers = column_map(diagnostic_type).headers(TableKind::Processes);
    out.push_str("## Processes\n\n");
    emit_header(out, headers);
    for p in processes {
        let cells: Vec<String> = headers
            .iter()
            .map(|(_, field)| match field {
                Field::Name => p.name.clone(),
                Field::Status => p.status.to_string(),
                Field::AddToEngagement => check_mark(p.add_to_engagement),
                Field::Function => p.function.clone(),
                Field::Outcome => p.outcome.clone(),
                Field::Metric => p.metric.clone(),
                Field::Description => p.description.clone(),
                Field::ServiceId => p.service_id.clone().unwrap_or_default(),
            })
            .collect();
        emit_row(out, &cells);
    }
    out.push('\n');
}

fn emit_tools(out: &mut String, diagnostic_type: DiagnosticType, tools: &[ToolRecord]) {
    let headers = column_map(diagnostic_type).headers(TableKind::Tools);
    out.push_str("## Tools\n\n");
    emit_header(out, headers);
    for t in tools {
        let cells: Vec<String> = headers
            .iter()
            .map(|(_, field)| match field {
                Field::Name => t.name.clone(),
                Field::Status => t.status.to_string(),
                Field::AddToEngagement => check_mark(t.add_to_engagement),
                Field::Function => t.function.clone(),
                Field::Description => t.description.clone(),
                Field::Outcome | Field::Metric | Field::ServiceId => String::new(),
            })
            .collect();
        emit_row(out, &cells);
    }
    out.push('\n');
}

fn emit_header(out: &mut String, headers: &[(&str, Field)]) {
    let names: Vec<String> = headers.iter().map(|(h, _)| h.to_string()).collect();
    emit_row(out, &names);
    let rule: Vec<String> = headers.iter().map(|_| "---".to_string()).collect();
    emit_row(out, &rule);
}

fn emit_row(out: &mut String, cells: &[String]) {
    let cleaned: Vec<String> = cells.iter().map(|c| clean_cell(c)).collect();
    out.push_str("| ");
    out.push_str(&cleaned.join(" | "));
    out.push_str(" |\n");
}

/// Cells cannot carry the column delimiter or line breaks.
fn clean_cell(cell: &str) -> String {
    cell.replace('|', "/").replace(['\r', '\n'], " ").trim().to_string()
}

fn check_mark(flag: bool) -> String {
    let mark = if flag { "✓" } else { "" };
    mark.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_diagnostic_markdown;

    #[test]
    fn clay_template_round_trips_one_process() {
        let doc = template(DiagnosticType::Clay);
        let parsed = parse_diagnostic_markdown(&doc, DiagnosticType::Clay);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.processes.len(), 1);
        let p = &parsed.processes[0];
        assert_eq!(p.name, "Example process");
        assert_eq!(p.status, Status::Warning);
        assert_eq!(p.function, "Example function");
        assert!(p.add_to_engagement);
        assert_eq!(parsed.tools.len(), 1);
    }

    #[test]
    fn every_template_parses_cleanly() {
        for dt in DiagnosticType::ALL {
            let parsed = parse_diagnostic_markdown(&template(dt), dt);
            assert!(parsed.warnings.is_empty(), "{dt}: {:?}", parsed.warnings);
            assert_eq!(parsed.processes.len(), 1, "{dt}");
        }
    }

    #[test]
    fn render_then_parse_is_idempotent() {
        let processes = vec![
            ProcessRecord {
                name: "Discount approvals".into(),
                status: Status::Warning,
                add_to_engagement: true,
                function: "Pricing".into(),
                outcome: "Deal velocity".into(),
                metric: "Approval cycle time".into(),
                description: "Matrix routes discounts".into(),
                service_id: Some("svc-approvals".into()),
            },
            ProcessRecord {
                name: "Order handoff".into(),
                status: Status::Healthy,
                ..ProcessRecord::default()
            },
        ];
        let tools = vec![ToolRecord {
            name: "Salesforce CPQ".into(),
            status: Status::Careful,
            add_to_engagement: false,
            function: "Quoting".into(),
            description: String::new(),
        }];

        let first = render_markdown(DiagnosticType::Cpq, &processes, &tools);
        let parsed = parse_diagnostic_markdown(&first, DiagnosticType::Cpq);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.processes, processes);
        assert_eq!(parsed.tools, tools);

        let second = render_markdown(DiagnosticType::Cpq, &parsed.processes, &parsed.tools);
        assert_eq!(first, second);
    }

    #[test]
    fn pipes_in_cells_do_not_split_columns() {
        let processes = vec![ProcessRecord {
            name: "Quote | Order".into(),
            status: Status::Careful,
            ..ProcessRecord::default()
        }];
        let parsed = parse_diagnostic_markdown(
            &render_markdown(DiagnosticType::Gtm, &processes, &[]),
            DiagnosticType::Gtm,
        );
        assert_eq!(parsed.processes[0].name, "Quote / Order");
        assert_eq!(parsed.processes[0].status, Status::Careful);
    }
}
