mod detect;

pub use detect::{detect_sync, resync, SnapshotDrift, StatusChange, SyncReport};
