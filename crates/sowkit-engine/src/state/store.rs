use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::atomic::{atomic_write, WriteLock};

/// Read and deserialize a JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Lock, pretty-print, atomically replace, unlock.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let lock = WriteLock::acquire(path)?;
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    atomic_write(path, json.as_bytes())?;
    lock.release()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sowkit_core::model::DiagnosticResult;
    use sowkit_core::types::DiagnosticType;

    #[test]
    fn save_then_load_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme.json");
        let diagnostic = DiagnosticResult::new("d1", "acme", DiagnosticType::Clay, Utc::now());

        save_json(&path, &diagnostic).unwrap();
        let loaded: DiagnosticResult = load_json(&path).unwrap();
        assert_eq!(loaded, diagnostic);
        assert!(!dir.path().join("acme.json.lock").exists());
    }

    #[test]
    fn load_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_json::<DiagnosticResult>(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
