use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Service catalog entry, as served by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub hours_low: f64,
    #[serde(default)]
    pub hours_high: f64,
    /// Absent rates are left out of averages rather than counted as zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rate: Option<f64>,
    #[serde(default)]
    pub key_steps: Vec<String>,
}

/// `serviceId -> entry`. Read-only to everything in this workspace.
pub type Catalog = HashMap<String, CatalogEntry>;

/// Parse a catalog from a JSON object keyed by service id.
pub fn catalog_from_json(content: &str) -> Result<Catalog, serde_json::Error> {
    serde_json::from_str(content)
}
