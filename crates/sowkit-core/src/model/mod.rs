pub mod catalog;
pub mod diagnostic;
pub mod sow;

pub use self::catalog::{catalog_from_json, Catalog, CatalogEntry};
pub use self::diagnostic::{DiagnosticResult, ProcessRecord, ToolRecord};
pub use self::sow::{fingerprint_processes, DiagnosticSnapshot, Sow, SowSection};
