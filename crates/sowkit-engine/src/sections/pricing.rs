use serde::Serialize;

use sowkit_core::model::SowSection;

/// Aggregate pricing across sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SowTotals {
    /// Sum of known section hours.
    pub hours: u64,
    /// Sum of `hours * rate` over sections that have both.
    pub amount: u64,
    /// Sections missing hours or rate; excluded from `amount`.
    pub unpriced_sections: usize,
}

/// Sums saturate at `u64::MAX` rather than wrapping.
pub fn sow_totals(sections: &[SowSection]) -> SowTotals {
    let mut totals = SowTotals::default();
    for section in sections {
        let hours = section.hours.map(u64::from).unwrap_or(0);
        totals.hours = totals.hours.saturating_add(hours);
        match section.amount() {
            Some(amount) => totals.amount = totals.amount.saturating_add(amount),
            None => totals.unpriced_sections += 1,
        }
    }
    totals
}
