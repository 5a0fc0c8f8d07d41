//! Core library for skipper, a local-first to-do list manager.
//!
//! Provides the item model, the write-through [`ItemStore`], JSON
//! persistence with a generated fallback collection, key-value
//! [`Settings`] and application configuration. All data lives in plain
//! files under a configurable data directory; there is no server
//! component.

pub mod config;
pub mod models;
pub mod settings;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::Item;
pub use settings::Settings;
pub use storage::{ItemPersistence, StorageError, StorageStats};
pub use store::ItemStore;
