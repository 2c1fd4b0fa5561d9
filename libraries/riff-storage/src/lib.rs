//! Riff Player - Storage
//!
//! `KeyValueStore` backends used to persist the player queue and settings:
//!
//! - [`MemoryStore`]: volatile, for tests and throwaway sessions
//! - [`RedbStore`]: a single-file embedded database

#![forbid(unsafe_code)]

mod error;
mod file;
mod memory;

pub use error::{Result, StorageError};
pub use file::RedbStore;
pub use memory::MemoryStore;
