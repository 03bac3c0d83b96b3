//! Attempt store implementations.
//!
//! - [`file_loader`]: reads a JSON attempt log from disk.
//! - [`memory_store`]: holds attempt logs in memory, keyed by session.

pub mod file_loader;
pub mod memory_store;
