//! Storage layer
//!
//! File-backed persistence for items and the errors it can produce.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{default_items, ItemPersistence, StorageStats, DEFAULT_ITEM_COUNT};
