use serde::{Deserialize, Serialize};

use sowkit_core::traits::Assessed;
use sowkit_core::types::Status;

/// Per-status tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: u32,
    pub careful: u32,
    pub warning: u32,
    pub unable: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.healthy + self.careful + self.warning + self.unable
    }
}

/// Tally statuses. Unrecognized statuses are skipped, not counted or rejected.
pub fn count_statuses<T: Assessed>(items: &[T]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for item in items {
        match item.status() {
            Status::Healthy => counts.healthy += 1,
            Status::Careful => counts.careful += 1,
            Status::Warning => counts.warning += 1,
            Status::Unable => counts.unable += 1,
            Status::Unrecognized(_) => {}
        }
    }
    counts
}

/// Insertion-ordered grouping: keys in first-seen order, members in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<'a, T> {
    entries: Vec<(String, Vec<&'a T>)>,
}

impl<'a, T> Groups<'a, T> {
    pub fn get(&self, key: &str) -> Option<&[&'a T]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, members)| members.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a T])> {
        self.entries
            .iter()
            .map(|(k, members)| (k.as_str(), members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group by a field selector; empty values fall into `"Other"`.
pub fn group_by<'a, T, F>(items: &'a [T], field: F) -> Groups<'a, T>
where
    F: Fn(&T) -> &str,
{
    group_by_or(items, field, "Other")
}

/// Group by a field selector with a caller-chosen bucket for empty values.
///
/// Keys are matched exactly (case-sensitive).
pub fn group_by_or<'a, T, F>(items: &'a [T], field: F, fallback: &str) -> Groups<'a, T>
where
    F: Fn(&T) -> &str,
{
    let mut entries: Vec<(String, Vec<&'a T>)> = Vec::new();
    for item in items {
        let value = field(item);
        let key = if value.is_empty() { fallback } else { value };
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, members)) => members.push(item),
            None => entries.push((key.to_string(), vec![item])),
        }
    }
    Groups { entries }
}
