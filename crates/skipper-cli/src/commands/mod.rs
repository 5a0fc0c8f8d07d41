//! CLI command handlers

pub mod config;
pub mod item;
pub mod settings;
pub mod status;
