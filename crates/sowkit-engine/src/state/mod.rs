mod atomic;
mod store;

pub use atomic::{atomic_write, WriteLock};
pub use store::{load_json, save_json};
