use serde::Serialize;

use sowkit_core::traits::Assessed;
use sowkit_core::types::{Status, Tier};

/// Priority buckets. Each keeps the relative input order of its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tiers<'a, T> {
    pub critical: Vec<&'a T>,
    pub warning: Vec<&'a T>,
    pub moderate: Vec<&'a T>,
    pub healthy: Vec<&'a T>,
}

impl<'a, T> Tiers<'a, T> {
    pub fn bucket(&self, tier: Tier) -> &[&'a T] {
        match tier {
            Tier::Critical => &self.critical,
            Tier::Warning => &self.warning,
            Tier::Moderate => &self.moderate,
            Tier::Healthy => &self.healthy,
        }
    }

    /// Buckets from most to least urgent.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[&'a T])> {
        Tier::ORDERED.into_iter().map(move |t| (t, self.bucket(t)))
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.warning.len() + self.moderate.len() + self.healthy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First match wins:
/// unable, or warning flagged for the engagement, is critical;
/// remaining warnings are warning; careful is moderate;
/// everything else, unrecognized statuses included, is healthy.
pub fn tier_of<T: Assessed>(item: &T) -> Tier {
    match item.status() {
        Status::Unable => Tier::Critical,
        Status::Warning if item.add_to_engagement() => Tier::Critical,
        Status::Warning => Tier::Warning,
        Status::Careful => Tier::Moderate,
        Status::Healthy | Status::Unrecognized(_) => Tier::Healthy,
    }
}

pub fn sort_by_priority<T: Assessed>(items: &[T]) -> Tiers<'_, T> {
    let mut tiers = Tiers {
        critical: Vec::new(),
        warning: Vec::new(),
        moderate: Vec::new(),
        healthy: Vec::new(),
    };
    for item in items {
        match tier_of(item) {
            Tier::Critical => tiers.critical.push(item),
            Tier::Warning => tiers.warning.push(item),
            Tier::Moderate => tiers.moderate.push(item),
            Tier::Healthy => tiers.healthy.push(item),
        }
    }
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use sowkit_core::model::ProcessRecord;

    fn p(name: &str, status: &str, flagged: bool) -> ProcessRecord {
        ProcessRecord {
            add_to_engagement: flagged,
            ..ProcessRecord::new(name, Status::parse(status))
        }
    }

    fn names(bucket: &[&ProcessRecord]) -> Vec<String> {
        bucket.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn flagged_warning_is_critical() {
        let items = vec![p("flagged", "warning", true), p("plain", "warning", false)];
        let tiers = sort_by_priority(&items);
        assert_eq!(names(&tiers.critical), vec!["flagged"]);
        assert_eq!(names(&tiers.warning), vec!["plain"]);
    }

    #[test]
    fn unrecognized_defaults_to_healthy() {
        let items = vec![p("odd", "pending", true)];
        let tiers = sort_by_priority(&items);
        assert_eq!(names(&tiers.healthy), vec!["odd"]);
    }

    #[test]
    fn partition_is_stable_and_complete() {
        let items = vec![
            p("a", "careful", false),
            p("b", "unable", false),
            p("c", "healthy", true),
            p("d", "warning", false),
            p("e", "na", false),
            p("f", "careful", true),
            p("g", "warning", true),
            p("h", "bogus", false),
        ];
        let tiers = sort_by_priority(&items);
        assert_eq!(names(&tiers.critical), vec!["b", "e", "g"]);
        assert_eq!(names(&tiers.warning), vec!["d"]);
        assert_eq!(names(&tiers.moderate), vec!["a", "f"]);
        assert_eq!(names(&tiers.healthy), vec!["c", "h"]);

        assert_eq!(tiers.len(), items.len());
        let mut all: Vec<String> = tiers.iter().flat_map(|(_, b)| names(b)).collect();
        all.sort();
        let mut expected: Vec<String> = items.iter().map(|r| r.name.clone()).collect();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn iter_walks_most_urgent_first() {
        let items = vec![p("x", "healthy", false)];
        let tiers = sort_by_priority(&items);
        let order: Vec<Tier> = tiers.iter().map(|(t, _)| t).collect();
        assert_eq!(order, Tier::ORDERED.to_vec());
    }
}
