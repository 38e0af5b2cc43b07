pub mod markdown;
pub mod render;

pub use self::markdown::{is_truthy, parse_diagnostic_markdown, ParsedDiagnostic};
pub use self::render::{render_markdown, template};
