pub mod generate;
pub mod links;
pub mod pricing;

pub use self::generate::{generate_sections_from_diagnostic, generate_sow};
pub use self::links::{link_section_items, SectionLinks};
pub use self::pricing::{sow_totals, SowTotals};
