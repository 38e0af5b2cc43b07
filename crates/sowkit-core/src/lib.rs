#![forbid(unsafe_code)]

pub mod columns;
pub mod config;
pub mod errors;
pub mod model;
pub mod schema;
pub mod seed;
pub mod traits;
pub mod types;
