use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use sowkit_core::columns::{column_map, normalize_header, ColumnMap, Field, TableKind};
use sowkit_core::model::{ProcessRecord, ToolRecord};
use sowkit_core::types::{DiagnosticType, Status};

/// Records parsed from a markdown import plus human-readable warnings.
///
/// Parsing never fails; callers decide whether warnings block the import.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedDiagnostic {
    pub processes: Vec<ProcessRecord>,
    pub tools: Vec<ToolRecord>,
    pub warnings: Vec<String>,
}

impl ParsedDiagnostic {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A table as read from the document: normalized headers and raw cells.
#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One data row after column mapping, before validation.
#[derive(Debug, Default)]
struct RawRow {
    name: String,
    status: Option<String>,
    add_to_engagement: Option<bool>,
    function: Option<String>,
    outcome: Option<String>,
    metric: Option<String>,
    description: Option<String>,
    service_id: Option<String>,
}

/// A row that passed the name check, with its status settled.
struct CheckedRow {
    status: Status,
    raw: RawRow,
}

/// Parse the semi-structured diagnostic markdown format.
///
/// `## ` headings select the target set: headings mentioning "process" open
/// the process table, "tool" the tool table, and "status legend" or
/// "how to edit" (or any other heading) close the active section. The first
/// `|` table inside an active section is consumed. Documents without any
/// `## ` heading are read as a single process table.
pub fn parse_diagnostic_markdown(text: &str, diagnostic_type: DiagnosticType) -> ParsedDiagnostic {
    let map = column_map(diagnostic_type);
    let lines: Vec<&str> = text.lines().collect();
    let has_sections = lines.iter().any(|l| heading_text(l).is_some());

    let mut process_rows: Vec<RawRow> = Vec::new();
    let mut tool_rows: Vec<RawRow> = Vec::new();

    if has_sections {
        let mut active: Option<TableKind> = None;
        let mut i = 0;
        while i < lines.len() {
            if let Some(heading) = heading_text(lines[i]) {
                active = classify_heading(heading);
                debug!(heading, section = ?active, "markdown section");
                i += 1;
                continue;
            }
            if is_table_line(lines[i]) {
                let (table, next) = read_table(&lines, i);
                if let Some(kind) = active.take() {
                    let rows = map_rows(map, kind, &table);
                    debug!(?kind, rows = rows.len(), "markdown table");
                    match kind {
                        TableKind::Processes => process_rows.extend(rows),
                        TableKind::Tools => tool_rows.extend(rows),
                    }
                }
                i = next;
                continue;
            }
            i += 1;
        }
    } else if let Some(start) = lines.iter().position(|l| is_table_line(l)) {
        debug!("no section headings; reading first table as processes");
        let (table, _) = read_table(&lines, start);
        process_rows = map_rows(map, TableKind::Processes, &table);
    }

    let mut warnings = Vec::new();

    let (checked, w) = check_rows(process_rows, "process");
    let processes: Vec<ProcessRecord> = checked.into_iter().map(into_process).collect();
    if processes.is_empty() {
        warnings.push(
            "No processes found. Put the table under a \"## Processes\" heading \
             with a Process column."
                .to_string(),
        );
    }
    warnings.extend(w);

    let (checked, w) = check_rows(tool_rows, "tool");
    let tools: Vec<ToolRecord> = checked.into_iter().map(into_tool).collect();
    warnings.extend(w);

    if !warnings.is_empty() {
        warn!(count = warnings.len(), "markdown import coerced or dropped rows");
    }
    debug!(
        processes = processes.len(),
        tools = tools.len(),
        warnings = warnings.len(),
        "markdown parsed"
    );

    ParsedDiagnostic {
        processes,
        tools,
        warnings,
    }
}

/// `true` for the accepted check marks and affirmatives, matched exactly.
pub fn is_truthy(cell: &str) -> bool {
    matches!(cell.trim(), "✓" | "✔" | "x" | "X" | "yes" | "true")
}

fn heading_text(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix("## ")
}

fn classify_heading(heading: &str) -> Option<TableKind> {
    let lowered = heading.to_lowercase();
    if lowered.contains("status legend") || lowered.contains("how to edit") {
        None
    } else if lowered.contains("process") {
        Some(TableKind::Processes)
    } else if lowered.contains("tool") {
        Some(TableKind::Tools)
    } else {
        None
    }
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Read the table starting at `start`. Returns it and the index after it.
fn read_table(lines: &[&str], start: usize) -> (Table, usize) {
    let headers = split_cells(lines[start])
        .iter()
        .map(|c| normalize_header(c))
        .collect();
    let mut i = start + 1;
    if lines.get(i).is_some_and(|l| l.contains("---")) {
        i += 1;
    }
    let mut rows = Vec::new();
    while i < lines.len() && is_table_line(lines[i]) {
        rows.push(split_cells(lines[i]));
        i += 1;
    }
    (Table { headers, rows }, i)
}

fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|c| c.trim().to_string()).collect()
}

fn map_rows(map: &ColumnMap, kind: TableKind, table: &Table) -> Vec<RawRow> {
    let columns: Vec<(usize, Field)> = table
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| map.resolve(kind, h).map(|f| (idx, f)))
        .collect();

    table
        .rows
        .iter()
        .map(|cells| {
            let mut row = RawRow::default();
            for &(idx, field) in &columns {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                assign(&mut row, field, cell);
            }
            row
        })
        .collect()
}

fn assign(row: &mut RawRow, field: Field, cell: &str) {
    let text = || (!cell.is_empty()).then(|| cell.to_string());
    match field {
        Field::Name => {
            if row.name.is_empty() {
                row.name = cell.to_string();
            }
        }
        Field::Status => {
            if !cell.is_empty() {
                row.status = Some(cell.trim().to_lowercase());
            }
        }
        Field::AddToEngagement => {
            row.add_to_engagement = Some(row.add_to_engagement.unwrap_or(false) || is_truthy(cell));
        }
        Field::Function => row.function = row.function.take().or_else(text),
        Field::Outcome => row.outcome = row.outcome.take().or_else(text),
        Field::Metric => row.metric = row.metric.take().or_else(text),
        Field::Description => row.description = row.description.take().or_else(text),
        Field::ServiceId => row.service_id = row.service_id.take().or_else(text),
    }
}

/// Drop nameless and duplicate rows and settle statuses.
///
/// Invalid statuses become `unable` on the returned copy; one aggregated
/// warning lists each offending name with its original value.
fn check_rows(rows: Vec<RawRow>, noun: &str) -> (Vec<CheckedRow>, Vec<String>) {
    let mut warnings = Vec::new();
    let empty_names = rows.iter().filter(|r| r.name.is_empty()).count();
    if empty_names > 0 {
        warnings.push(format!(
            "{empty_names} {noun} row(s) skipped: missing name"
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();
    let mut checked = Vec::new();

    for raw in rows.into_iter().filter(|r| !r.name.is_empty()) {
        if !seen.insert(raw.name.clone()) {
            duplicates.push(raw.name);
            continue;
        }
        let status = match raw.status.as_deref() {
            None => Status::Unable,
            Some(s) if Status::CANONICAL.contains(&s) => Status::parse(s),
            Some(s) => {
                invalid.push(format!("{} (\"{s}\")", raw.name));
                Status::Unable
            }
        };
        checked.push(CheckedRow { status, raw });
    }

    if !invalid.is_empty() {
        warnings.push(format!(
            "Invalid {noun} status value(s) set to \"unable\": {}. Valid values: {}",
            invalid.join(", "),
            Status::CANONICAL.join(", ")
        ));
    }
    if !duplicates.is_empty() {
        warnings.push(format!(
            "Duplicate {noun} name(s) dropped, first row kept: {}",
            duplicates.join(", ")
        ));
    }
    (checked, warnings)
}

fn into_process(row: CheckedRow) -> ProcessRecord {
    let CheckedRow { status, raw } = row;
    ProcessRecord {
        name: raw.name,
        status,
        add_to_engagement: raw.add_to_engagement.unwrap_or(false),
        function: raw.function.unwrap_or_default(),
        outcome: raw.outcome.unwrap_or_default(),
        metric: raw.metric.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        service_id: raw.service_id,
    }
}

fn into_tool(row: CheckedRow) -> ToolRecord {
    let CheckedRow { status, raw } = row;
    ToolRecord {
        name: raw.name,
        status,
        add_to_engagement: raw.add_to_engagement.unwrap_or(false),
        function: raw.function.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
    }
}
