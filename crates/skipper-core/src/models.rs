//! Data model for Skipper
//!
//! Defines `Item`, the single record type: a to-do/notes entry with a
//! title, free-form notes, a date, and a favorite flag. Items are
//! serialized as-is into the persisted JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do/notes entry
///
/// Identity is the `id` field; two items with the same `id` refer to the
/// same entry even when their other fields differ. Structural equality
/// (`PartialEq`) compares every field and drives change detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier, immutable after creation
    pub id: Uuid,
    /// Item date, defaults to creation time
    pub date: DateTime<Utc>,
    /// Favorite flag
    pub favorite: bool,
    /// Title, may be empty
    pub title: String,
    /// Free-form notes, may be empty
    pub notes: String,
}

impl Item {
    /// Create a new item with a fresh id and all fields at their defaults
    pub fn new() -> Self {
        Self::with_date(Utc::now())
    }

    /// Create a new item carrying a specific date
    pub fn with_date(date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            favorite: false,
            title: String::new(),
            notes: String::new(),
        }
    }

    /// Display title: the title itself, or the complete date string when
    /// the title is empty
    pub fn item_title(&self) -> String {
        if self.title.is_empty() {
            self.date_string()
        } else {
            self.title.clone()
        }
    }

    /// Complete date, e.g. `Tuesday, August 25, 2026`
    pub fn date_string(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }

    /// Abbreviated date with short time, e.g. `Aug 25, 2026, 9:15 AM`
    pub fn date_time_string(&self) -> String {
        self.date.format("%b %-d, %Y, %-I:%M %p").to_string()
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}
