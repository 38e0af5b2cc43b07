use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::DiagnosticType;

pub const WORKSPACE_DIR: &str = ".sowkit";
pub const CONFIG_FILE: &str = ".sowkit/config.json";

/// Workspace defaults. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_type")]
    pub diagnostic_type: DiagnosticType,
    /// Path to the service catalog JSON used by `generate`.
    #[serde(default)]
    pub catalog: Option<String>,
    /// Fail imports that produce warnings.
    #[serde(default)]
    pub strict_import: bool,
}

fn default_type() -> DiagnosticType {
    DiagnosticType::Gtm
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diagnostic_type: default_type(),
            catalog: None,
            strict_import: false,
        }
    }
}

impl Config {
    /// Load `.sowkit/config.json` from the working directory, or defaults.
    pub fn load_workspace() -> Self {
        Self::load_or_default(Path::new(CONFIG_FILE))
    }

    /// Defaults when `path` is absent. A file that exists but cannot be
    /// loaded is logged before falling back.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "ignoring workspace config, using defaults");
            Self::default()
        })
    }

    /// Load a config file. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("{}: invalid config", path.display()))
    }

    /// Write this config under `root/.sowkit/config.json`.
    pub fn write_to(&self, root: &Path) -> Result<()> {
        let dir = root.join(WORKSPACE_DIR);
        std::fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;
        let json = serde_json::to_string_pretty(self)?;
        let path = root.join(CONFIG_FILE);
        std::fs::write(&path, json).with_context(|| format!("cannot write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "strict_import": true }"#).unwrap();
        assert_eq!(cfg.diagnostic_type, DiagnosticType::Gtm);
        assert!(cfg.strict_import);
        assert!(cfg.catalog.is_none());
    }

    #[test]
    fn write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            diagnostic_type: DiagnosticType::Cpq,
            catalog: Some("catalog.json".into()),
            strict_import: false,
        };
        cfg.write_to(dir.path()).unwrap();
        let loaded = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert!(Config::load_from(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn malformed_file_reports_then_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "strict_import": "yes" }"#).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"), "{err:#}");
        assert_eq!(Config::load_or_default(&path), Config::default());
    }
}
