//! File-backed stores for the persistent scope.

mod atomic_json;
mod json_file_store;

pub use atomic_json::AtomicJsonFile;
pub use json_file_store::JsonFileStore;
