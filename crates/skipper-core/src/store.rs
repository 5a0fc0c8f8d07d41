//! Item store
//!
//! Owns the ordered item collection and writes it through to disk after
//! every mutation. The collection in memory is authoritative: a failed
//! save is logged and the session carries on, and a failed load falls
//! back to a generated year of placeholder items.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::Config;
use crate::models::Item;
use crate::settings::{Settings, NAME_KEY};
use crate::storage::{ItemPersistence, StorageStats};

/// Ordered collection of items with write-through persistence
pub struct ItemStore {
    config: Config,
    persistence: ItemPersistence,
    settings: Settings,
    items: Vec<Item>,
}

impl ItemStore {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(config))
    }

    /// Open the store with the given configuration
    ///
    /// Always succeeds: items that cannot be loaded are replaced with
    /// generated defaults, and nothing is written until the first
    /// mutation.
    pub fn open_with_config(config: Config) -> Self {
        let persistence = ItemPersistence::new(&config);
        let settings = Settings::open(&config);
        let items = persistence.load_or_default(Utc::now());

        Self {
            config,
            persistence,
            settings,
            items,
        }
    }

    /// The items in display order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id
    pub fn get(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Position of an item in the list
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// The user's display name
    pub fn name(&self) -> &str {
        self.settings.name()
    }

    /// Update the user's display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.settings.set(NAME_KEY, name.into());
    }

    /// The settings store
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The settings store, mutable
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stats for the on-disk documents
    pub fn stats(&self) -> StorageStats {
        StorageStats::gather(&self.config)
    }

    /// Insert an item at the given position
    ///
    /// Positions past the end append. Saves the list.
    pub fn insert(&mut self, item: Item, index: usize) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.persist();
    }

    /// Remove the items at the given positions
    ///
    /// Duplicate positions count once and out-of-range positions are
    /// ignored, so a stale position set cannot remove the wrong item.
    /// Saves the list.
    pub fn delete(&mut self, offsets: &[usize]) {
        let mut sorted: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&index| index < self.items.len())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        for index in sorted.into_iter().rev() {
            self.items.remove(index);
        }
        self.persist();
    }

    /// Move the items at `from` so they sit before the item currently at
    /// position `to`
    ///
    /// `to` is measured against the list before anything is removed, with
    /// `to == len` meaning the end. The moved items keep their relative
    /// order. Saves the list.
    pub fn move_items(&mut self, from: &[usize], to: usize) {
        let len = self.items.len();
        let mut sources: Vec<usize> = from
            .iter()
            .copied()
            .filter(|&index| index < len)
            .collect();
        sources.sort_unstable();
        sources.dedup();

        let to = to.min(len);
        let mut moved = Vec::with_capacity(sources.len());
        for &index in sources.iter().rev() {
            moved.push(self.items.remove(index));
        }
        moved.reverse();

        let removed_before_destination = sources.iter().filter(|&&index| index < to).count();
        let insert_at = to - removed_before_destination;
        for (offset, item) in moved.into_iter().enumerate() {
            self.items.insert(insert_at + offset, item);
        }
        self.persist();
    }

    /// Replace the stored item carrying the same id
    ///
    /// When no stored item matches, the list is unchanged; the list is
    /// saved either way.
    pub fn save_item(&mut self, item: &Item) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => debug!("No stored item with id {}, list unchanged", item.id),
        }
        self.persist();
    }

    /// Check whether `item` differs from the stored item with its id
    ///
    /// True when the stored copy differs in any field, or when no stored
    /// item carries the id. Never mutates or saves.
    pub fn is_updated(&self, item: &Item) -> bool {
        match self.get(item.id) {
            Some(existing) => existing != item,
            None => true,
        }
    }

    /// Remove every item. Saves the (empty) list.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.persistence.save(&self.items) {
            error!(
                "Failed to save items to {:?}: {}",
                self.persistence.path(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_store() -> (ItemStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let store = ItemStore::open_with_config(config);
        (store, temp)
    }

    fn empty_store() -> (ItemStore, TempDir) {
        let (mut store, temp) = test_store();
        store.clear();
        (store, temp)
    }

    fn titled(title: &str) -> Item {
        let mut item = Item::new();
        item.title = title.to_string();
        item
    }

    fn titles(store: &ItemStore) -> Vec<String> {
        store.items().iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_open_without_saved_data_generates_year_of_items() {
        let (store, _temp) = test_store();

        assert_eq!(store.len(), 365);
        assert!(store.items().iter().all(|i| i.title.is_empty()));
        assert!(store.items().iter().all(|i| !i.favorite));
        for pair in store.items().windows(2) {
            assert!(pair[0].date > pair[1].date);
        }
    }

    #[test]
    fn test_generated_items_not_written_until_first_mutation() {
        let (mut store, _temp) = test_store();
        let items_path = store.config().items_path();

        assert!(!items_path.exists());
        store.insert(Item::new(), 0);
        assert!(items_path.exists());
    }

    #[test]
    fn test_empty_saved_list_is_not_replaced_with_defaults() {
        let (store, _temp) = empty_store();
        let config = store.config().clone();
        drop(store);

        let reopened = ItemStore::open_with_config(config);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_insert_at_front_and_middle() {
        let (mut store, _temp) = empty_store();

        store.insert(titled("b"), 0);
        store.insert(titled("a"), 0);
        store.insert(titled("middle"), 1);

        assert_eq!(titles(&store), vec!["a", "middle", "b"]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let (mut store, _temp) = empty_store();

        store.insert(titled("a"), 0);
        store.insert(titled("z"), 99);

        assert_eq!(titles(&store), vec!["a", "z"]);
    }

    #[test]
    fn test_insert_persists_across_reopen() {
        let (mut store, temp) = empty_store();
        let item = titled("remember me");
        let id = item.id;
        store.insert(item, 0);
        drop(store);

        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let reopened = ItemStore::open_with_config(config);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get(id).unwrap().title, "remember me");
    }

    #[test]
    fn test_delete_single_position() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.delete(&[1]);

        assert_eq!(titles(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_delete_multiple_positions_at_once() {
        let (mut store, _temp) = empty_store();
        for title in ["d", "c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.delete(&[0, 2]);

        assert_eq!(titles(&store), vec!["b", "d"]);
    }

    #[test]
    fn test_delete_ignores_duplicates_and_out_of_range() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.delete(&[1, 1, 99]);

        assert_eq!(titles(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_move_single_item_forward() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[0], 2);

        assert_eq!(titles(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_single_item_backward() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[2], 0);

        assert_eq!(titles(&store), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_to_end() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[0], 3);

        assert_eq!(titles(&store), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_multiple_items_keeps_relative_order() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[0, 2], 1);

        assert_eq!(titles(&store), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_to_own_position_is_a_no_op() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[1], 1);

        assert_eq!(titles(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_clamps_destination() {
        let (mut store, _temp) = empty_store();
        for title in ["b", "a"] {
            store.insert(titled(title), 0);
        }

        store.move_items(&[0], 99);

        assert_eq!(titles(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_save_item_replaces_matching_item() {
        let (mut store, _temp) = empty_store();
        store.insert(titled("original"), 0);

        let mut edited = store.items()[0].clone();
        edited.title = "edited".to_string();
        edited.favorite = true;
        store.save_item(&edited);

        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0], edited);
    }

    #[test]
    fn test_save_item_preserves_position() {
        let (mut store, _temp) = empty_store();
        for title in ["c", "b", "a"] {
            store.insert(titled(title), 0);
        }

        let mut edited = store.items()[1].clone();
        edited.notes = "updated".to_string();
        store.save_item(&edited);

        assert_eq!(titles(&store), vec!["a", "b", "c"]);
        assert_eq!(store.items()[1].notes, "updated");
    }

    #[test]
    fn test_save_item_with_unknown_id_leaves_list_but_still_saves() {
        let (mut store, _temp) = empty_store();
        store.insert(titled("only"), 0);
        let items_path = store.config().items_path();
        fs::remove_file(&items_path).unwrap();

        store.save_item(&titled("stranger"));

        assert_eq!(titles(&store), vec!["only"]);
        // The save still ran even though nothing matched
        assert!(items_path.exists());
    }

    #[test]
    fn test_is_updated_false_for_unchanged_copy() {
        let (mut store, _temp) = empty_store();
        store.insert(titled("steady"), 0);

        let copy = store.items()[0].clone();
        assert!(!store.is_updated(&copy));
    }

    #[test]
    fn test_is_updated_true_for_any_field_change() {
        let (mut store, _temp) = empty_store();
        store.insert(titled("steady"), 0);

        let mut copy = store.items()[0].clone();
        copy.favorite = true;
        assert!(store.is_updated(&copy));

        let mut copy = store.items()[0].clone();
        copy.notes = "n".to_string();
        assert!(store.is_updated(&copy));
    }

    #[test]
    fn test_is_updated_true_for_unknown_id() {
        let (store, _temp) = empty_store();

        assert!(store.is_updated(&Item::new()));
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let (mut store, temp) = test_store();
        assert_eq!(store.len(), 365);

        store.clear();
        assert!(store.is_empty());
        drop(store);

        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let reopened = ItemStore::open_with_config(config);
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_in_memory_state() {
        let (mut store, _temp) = empty_store();
        // Occupy the document path with a directory so the rename fails
        let items_path = store.config().items_path();
        fs::remove_file(&items_path).unwrap();
        fs::create_dir(&items_path).unwrap();

        store.insert(titled("survivor"), 0);

        assert_eq!(titles(&store), vec!["survivor"]);
    }

    #[test]
    fn test_name_defaults_and_persists() {
        let (mut store, temp) = empty_store();
        assert_eq!(store.name(), "Skipper");

        store.set_name("Alex");
        assert_eq!(store.name(), "Alex");
        drop(store);

        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let reopened = ItemStore::open_with_config(config);
        assert_eq!(reopened.name(), "Alex");
    }

    #[test]
    fn test_get_and_position() {
        let (mut store, _temp) = empty_store();
        let item = titled("findme");
        let id = item.id;
        store.insert(titled("other"), 0);
        store.insert(item, 1);

        assert_eq!(store.get(id).unwrap().title, "findme");
        assert_eq!(store.position(id), Some(1));
        assert_eq!(store.position(Uuid::new_v4()), None);
    }
}
