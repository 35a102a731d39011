pub mod format;
pub mod log_store;
pub mod snapshot_store;
