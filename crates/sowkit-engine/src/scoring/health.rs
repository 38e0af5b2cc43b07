use serde::Serialize;

use sowkit_core::traits::Assessed;
use sowkit_core::types::Rating;

use super::stats::{count_statuses, StatusCounts};

/// Weighted 0..=100 score: healthy 100, careful 50, warning 25, unable 0.
///
/// An empty tally scores 0.
pub fn compute_health_score(stats: &StatusCounts) -> u8 {
    let total = stats.total();
    if total == 0 {
        return 0;
    }
    let weighted = f64::from(stats.healthy) * 100.0
        + f64::from(stats.careful) * 50.0
        + f64::from(stats.warning) * 25.0;
    (weighted / f64::from(total)).round() as u8
}

/// Lower bounds are inclusive: 75 is healthy, 50 moderate, 25 warning.
pub fn overall_rating(score: u8) -> Rating {
    match score {
        75.. => Rating::Healthy,
        50..=74 => Rating::Moderate,
        25..=49 => Rating::Warning,
        _ => Rating::Critical,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub counts: StatusCounts,
    pub score: u8,
    pub rating: Rating,
}

pub fn health_summary<T: Assessed>(items: &[T]) -> HealthSummary {
    let counts = count_statuses(items);
    let score = compute_health_score(&counts);
    HealthSummary {
        counts,
        score,
        rating: overall_rating(score),
    }
}
