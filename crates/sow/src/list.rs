use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use sowkit_core::model::DiagnosticResult;
use sowkit_core::schema::{detect_kind, DocumentKind};
use sowkit_engine::scoring::health_summary;

/// Summary row for one diagnostic file.
pub struct DiagnosticRow {
    pub file: String,
    pub customer: String,
    pub kind: String,
    pub processes: usize,
    pub score: u8,
    pub rating: String,
}

/// Scan a directory for diagnostic `.json` files. SOWs and broken files are skipped.
pub fn scan_dir(dir: &str) -> Result<Vec<DiagnosticRow>> {
    let entries = std::fs::read_dir(dir).with_context(|| format!("cannot read directory {dir}"))?;

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut rows = Vec::new();
    for path in paths {
        match load_row(&path) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::debug!("skip {}: {e:#}", path.display()),
        }
    }
    Ok(rows)
}

fn load_row(path: &Path) -> Result<DiagnosticRow> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let data: Value = serde_json::from_str(&content)
        .with_context(|| format!("{}: invalid JSON", path.display()))?;
    if detect_kind(&data) != DocumentKind::Diagnostic {
        bail!("{}: not a diagnostic", path.display());
    }
    let diagnostic: DiagnosticResult = serde_json::from_value(data)
        .with_context(|| format!("{}: not a diagnostic", path.display()))?;
    let summary = health_summary(&diagnostic.processes);

    Ok(DiagnosticRow {
        file: path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default(),
        customer: diagnostic.customer_id,
        kind: diagnostic.diagnostic_type.to_string(),
        processes: diagnostic.processes.len(),
        score: summary.score,
        rating: summary.rating.to_string(),
    })
}

/// Print rows as an aligned table to stdout.
pub fn print_table(rows: &[DiagnosticRow]) {
    if rows.is_empty() {
        println!("(no diagnostics found)");
        return;
    }
    let w_file = rows.iter().map(|r| r.file.len()).max().unwrap_or(4).max(4);
    let w_cust = rows.iter().map(|r| r.customer.len()).max().unwrap_or(8).max(8);

    println!(
        "{:<w_file$}  {:<w_cust$}  {:<4}  {:>9}  {:>5}  RATING",
        "FILE", "CUSTOMER", "TYPE", "PROCESSES", "SCORE"
    );
    println!(
        "{:<w_file$}  {:<w_cust$}  {:<4}  {:>9}  {:>5}  ------",
        "-".repeat(w_file),
        "-".repeat(w_cust),
        "----",
        "---------",
        "-----"
    );
    for r in rows {
        println!(
            "{:<w_file$}  {:<w_cust$}  {:<4}  {:>9}  {:>5}  {}",
            r.file, r.customer, r.kind, r.processes, r.score, r.rating
        );
    }
}
