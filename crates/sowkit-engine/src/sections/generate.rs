use chrono::{DateTime, Utc};
use tracing::debug;

use sowkit_core::columns::normalize_header;
use sowkit_core::model::{DiagnosticResult, DiagnosticSnapshot, ProcessRecord, Sow, SowSection};
use sowkit_core::traits::ServiceCatalog;
use sowkit_core::types::Status;

use crate::scoring::{count_statuses, group_by_or};

/// Derive one SOW section per function from the actionable processes.
///
/// Algorithm:
/// 1. Keep warning/unable items and anything flagged for the engagement
/// 2. Group by function (empty function -> "General"), first-seen order
/// 3. Sum catalog hours and average catalog rates over matched items only;
///    entries with negative or non-finite hours do not match, and such
///    rates are left out of the average
/// 4. Deliverables are the matched entries' key steps, deduplicated, or
///    the item names when nothing matched
///
/// Pure: the same input always yields the same sections and ids.
pub fn generate_sections_from_diagnostic<C>(
    processes: &[ProcessRecord],
    catalog: &C,
) -> Vec<SowSection>
where
    C: ServiceCatalog + ?Sized,
{
    let actionable: Vec<&ProcessRecord> = processes.iter().filter(|p| p.is_actionable()).collect();
    if actionable.is_empty() {
        return Vec::new();
    }

    let groups = group_by_or(&actionable, |p| p.function.as_str(), "General");
    let mut sections = Vec::with_capacity(groups.len());

    for (idx, (function, items)) in groups.iter().enumerate() {
        let mut sum_low = 0.0_f64;
        let mut sum_high = 0.0_f64;
        let mut rate_sum = 0.0_f64;
        let mut rate_count = 0u32;
        let mut matched = 0usize;
        let mut deliverables: Vec<String> = Vec::new();

        for item in items {
            let Some(service) = item.service_id.as_deref() else {
                continue;
            };
            let Some(entry) = catalog.lookup(service) else {
                continue;
            };
            if !is_quantity(entry.hours_low) || !is_quantity(entry.hours_high) {
                debug!(
                    service,
                    low = entry.hours_low,
                    high = entry.hours_high,
                    "skipping catalog entry with unusable hours"
                );
                continue;
            }
            matched += 1;
            sum_low += entry.hours_low;
            sum_high += entry.hours_high;
            match entry.default_rate {
                Some(rate) if is_quantity(rate) => {
                    rate_sum += rate;
                    rate_count += 1;
                }
                Some(rate) => debug!(service, rate, "ignoring unusable rate"),
                None => {}
            }
            for step in &entry.key_steps {
                if !deliverables.contains(step) {
                    deliverables.push(step.clone());
                }
            }
        }

        let names: Vec<String> = items.iter().map(|p| p.name.clone()).collect();
        if matched == 0 {
            deliverables = names.clone();
        }

        let hours = (sum_low > 0.0).then(|| to_u32((sum_low + sum_high) / 2.0));
        let rate = (rate_count > 0).then(|| to_u32(rate_sum / f64::from(rate_count)));

        debug!(
            function,
            items = items.len(),
            matched,
            ?hours,
            ?rate,
            "generated section"
        );

        let records: Vec<&ProcessRecord> = items.iter().map(|p| **p).collect();
        sections.push(SowSection {
            id: section_id(idx, function),
            title: function.to_string(),
            description: format!("Addresses {} diagnostic finding(s).", status_summary(&records)),
            deliverables,
            hours,
            rate,
            diagnostic_items: names,
            sort_order: idx as u32,
            start_date: None,
            end_date: None,
        });
    }

    sections
}

fn is_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Round and clamp into `u32`; sums of finite values can still exceed it.
fn to_u32(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Build a SOW from a diagnostic: generated sections plus a frozen snapshot.
pub fn generate_sow<C>(
    id: &str,
    title: &str,
    diagnostic: &DiagnosticResult,
    catalog: &C,
    now: DateTime<Utc>,
) -> Sow
where
    C: ServiceCatalog + ?Sized,
{
    Sow {
        id: id.to_string(),
        customer_id: diagnostic.customer_id.clone(),
        diagnostic_type: Some(diagnostic.diagnostic_type),
        title: title.to_string(),
        sections: generate_sections_from_diagnostic(&diagnostic.processes, catalog),
        diagnostic_snapshot: Some(DiagnosticSnapshot::capture(diagnostic.processes.clone(), now)),
        created_at: now,
        updated_at: now,
    }
}

/// "2 warning, 1 unable" style tally, most severe first, zero counts omitted.
fn status_summary(items: &[&ProcessRecord]) -> String {
    let counts = count_statuses(items);
    let other = items
        .iter()
        .filter(|p| matches!(p.status, Status::Unrecognized(_)))
        .count() as u32;

    [
        (counts.warning, "warning"),
        (counts.unable, "unable"),
        (counts.careful, "careful"),
        (counts.healthy, "healthy"),
        (other, "other"),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .collect::<Vec<_>>()
    .join(", ")
}

fn section_id(idx: usize, function: &str) -> String {
    let slug = normalize_header(function).replace('_', "-");
    if slug.is_empty() {
        format!("diag-{idx}")
    } else {
        format!("diag-{idx}-{slug}")
    }
}
