use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::SowError;

/// Health status of a single inspected process or tool.
///
/// `Status::parse` is the one normalization point: `na` folds into
/// [`Status::Unable`], anything outside the canonical four is kept as
/// [`Status::Unrecognized`] so lenient aggregation can skip it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Status {
    Healthy,
    Careful,
    Warning,
    #[default]
    Unable,
    Unrecognized(String),
}

impl Status {
    pub const CANONICAL: [&'static str; 4] = ["healthy", "careful", "warning", "unable"];

    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "healthy" => Status::Healthy,
            "careful" => Status::Careful,
            "warning" => Status::Warning,
            "unable" | "na" => Status::Unable,
            _ => Status::Unrecognized(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Healthy => "healthy",
            Status::Careful => "careful",
            Status::Warning => "warning",
            Status::Unable => "unable",
            Status::Unrecognized(s) => s.as_str(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, Status::Unrecognized(_))
    }

    /// Warning and unable findings need remediation regardless of priority flag.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Status::Warning | Status::Unable)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::parse(&raw))
    }
}

/// Assessment family. Selects column maps and seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticType {
    Gtm,
    Clay,
    Cpq,
}

impl DiagnosticType {
    pub const ALL: [DiagnosticType; 3] =
        [DiagnosticType::Gtm, DiagnosticType::Clay, DiagnosticType::Cpq];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticType::Gtm => "gtm",
            DiagnosticType::Clay => "clay",
            DiagnosticType::Cpq => "cpq",
        }
    }

    /// Human label used in rendered documents.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticType::Gtm => "GTM",
            DiagnosticType::Clay => "Clay",
            DiagnosticType::Cpq => "CPQ",
        }
    }
}

impl fmt::Display for DiagnosticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticType {
    type Err = SowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gtm" => Ok(DiagnosticType::Gtm),
            "clay" => Ok(DiagnosticType::Clay),
            "cpq" => Ok(DiagnosticType::Cpq),
            other => Err(SowError::UnknownDiagnosticType(other.to_string())),
        }
    }
}

/// Four-band overall rating derived from a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Healthy,
    Moderate,
    Warning,
    Critical,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Healthy => "healthy",
            Rating::Moderate => "moderate",
            Rating::Warning => "warning",
            Rating::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Priority bucket, ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical,
    Warning,
    Moderate,
    Healthy,
}

impl Tier {
    pub const ORDERED: [Tier; 4] = [Tier::Critical, Tier::Warning, Tier::Moderate, Tier::Healthy];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Critical => "critical",
            Tier::Warning => "warning",
            Tier::Moderate => "moderate",
            Tier::Healthy => "healthy",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_normalizes() {
        assert_eq!(Status::parse(" Warning "), Status::Warning);
        assert_eq!(Status::parse("NA"), Status::Unable);
        assert_eq!(
            Status::parse("Bogus"),
            Status::Unrecognized("bogus".to_string())
        );
        assert!(!Status::parse("bogus").is_canonical());
    }

    #[test]
    fn status_serde_is_plain_string() {
        let json = serde_json::to_string(&Status::Careful).unwrap();
        assert_eq!(json, "\"careful\"");
        let parsed: Status = serde_json::from_str("\"na\"").unwrap();
        assert_eq!(parsed, Status::Unable);
        let odd: Status = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(serde_json::to_string(&odd).unwrap(), "\"pending\"");
    }

    #[test]
    fn diagnostic_type_from_str() {
        assert_eq!("CLAY".parse::<DiagnosticType>().unwrap(), DiagnosticType::Clay);
        assert!("crm".parse::<DiagnosticType>().is_err());
    }

    #[test]
    fn tier_order_is_most_urgent_first() {
        let mut tiers = vec![Tier::Healthy, Tier::Critical, Tier::Moderate, Tier::Warning];
        tiers.sort();
        assert_eq!(tiers, Tier::ORDERED.to_vec());
    }
}
