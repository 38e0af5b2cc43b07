pub mod health;
pub mod stats;
pub mod tiers;

pub use self::health::{compute_health_score, health_summary, overall_rating, HealthSummary};
pub use self::stats::{count_statuses, group_by, group_by_or, Groups, StatusCounts};
pub use self::tiers::{sort_by_priority, tier_of, Tiers};
