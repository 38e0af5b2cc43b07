#![forbid(unsafe_code)]

pub mod ingest;
pub mod scoring;
pub mod sections;
pub mod state;
pub mod sync;
