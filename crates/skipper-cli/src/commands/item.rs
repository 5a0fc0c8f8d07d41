//! Item command handlers

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use skipper_core::{Item, ItemStore};

use crate::editor::{confirm, edit_text};
use crate::output::Output;

/// List items, optionally only favorites
pub fn list(store: &ItemStore, favorites: bool, output: &Output) -> Result<()> {
    let rows: Vec<(usize, &Item)> = store
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| !favorites || item.favorite)
        .collect();

    output.print_items(&rows);
    Ok(())
}

/// Add a new item
pub fn add(
    store: &mut ItemStore,
    title: Option<String>,
    notes: Option<String>,
    date: Option<String>,
    favorite: bool,
    at: usize,
    output: &Output,
) -> Result<()> {
    let mut item = match date {
        Some(ref raw) => Item::with_date(parse_date(raw)?),
        None => Item::new(),
    };

    if let Some(title) = title {
        item.title = title;
    }
    if let Some(notes) = notes {
        item.notes = notes;
    }
    item.favorite = favorite;

    let id = item.id;
    store.insert(item, at);

    output.success(&format!("Added item: {}", id));
    if let Some(item) = store.get(id) {
        output.print_item(item);
    }

    Ok(())
}

/// Show a single item
pub fn show(store: &ItemStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;

    let item = store
        .get(uuid)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    output.print_item(item);
    Ok(())
}

/// Edit an item
///
/// With field flags, applies them directly. Without any, opens the notes
/// in $EDITOR. Either way the item is only saved when something actually
/// changed.
pub fn edit(
    store: &mut ItemStore,
    id: String,
    title: Option<String>,
    notes: Option<String>,
    date: Option<String>,
    favorite: Option<bool>,
    output: &Output,
) -> Result<()> {
    let uuid = parse_item_id(&id, store)?;

    let mut item = store
        .get(uuid)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?
        .clone();

    if title.is_none() && notes.is_none() && date.is_none() && favorite.is_none() {
        let edited = edit_text(&item.notes).context("Failed to edit notes")?;
        item.notes = edited.trim().to_string();
    } else {
        if let Some(title) = title {
            item.title = title;
        }
        if let Some(notes) = notes {
            item.notes = notes;
        }
        if let Some(ref raw) = date {
            item.date = parse_date(raw)?;
        }
        if let Some(favorite) = favorite {
            item.favorite = favorite;
        }
    }

    if !store.is_updated(&item) {
        output.message("No changes.");
        return Ok(());
    }

    store.save_item(&item);

    output.success("Item updated");
    output.print_item(&item);

    Ok(())
}

/// Delete items
pub fn delete(store: &mut ItemStore, ids: Vec<String>, yes: bool, output: &Output) -> Result<()> {
    let mut offsets = Vec::with_capacity(ids.len());
    for id in &ids {
        let uuid = parse_item_id(id, store)?;
        let position = store
            .position(uuid)
            .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;
        offsets.push(position);
    }
    offsets.sort_unstable();
    offsets.dedup();

    if !yes && output.should_prompt() {
        for &offset in &offsets {
            let item = &store.items()[offset];
            println!(
                "Delete item: {} - {}",
                &item.id.to_string()[..8],
                item.item_title()
            );
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = offsets.len();
    store.delete(&offsets);

    output.success(&format!("Deleted {} item(s)", count));
    Ok(())
}

/// Move items to a new position
pub fn move_items(
    store: &mut ItemStore,
    ids: Vec<String>,
    to: usize,
    output: &Output,
) -> Result<()> {
    let mut from = Vec::with_capacity(ids.len());
    for id in &ids {
        let uuid = parse_item_id(id, store)?;
        let position = store
            .position(uuid)
            .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;
        from.push(position);
    }
    from.sort_unstable();
    from.dedup();

    let count = from.len();
    store.move_items(&from, to);

    output.success(&format!("Moved {} item(s)", count));
    Ok(())
}

/// Remove all items
pub fn clear(store: &mut ItemStore, yes: bool, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.message("No items to clear.");
        return Ok(());
    }

    if !yes && output.should_prompt() {
        println!("This removes all {} item(s).", store.len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = store.len();
    store.clear();

    output.success(&format!("Cleared {} item(s)", count));
    Ok(())
}

/// Parse an item ID (supports full UUID or prefix)
fn parse_item_id(id: &str, store: &ItemStore) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let matches: Vec<&Item> = store
        .items()
        .iter()
        .filter(|item| item.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No item found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple items match '{}':", id);
            for item in &matches {
                eprintln!("  {} - {}", item.id, item.item_title());
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Parse a date given as RFC 3339 or YYYY-MM-DD
fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: '{}'. Use RFC 3339 or YYYY-MM-DD.", raw))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipper_core::Config;
    use tempfile::TempDir;

    fn empty_store(temp: &TempDir) -> ItemStore {
        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        let mut store = ItemStore::open_with_config(config);
        store.clear();
        store
    }

    fn item_with_id(id: &str) -> Item {
        let mut item = Item::new();
        item.id = Uuid::parse_str(id).unwrap();
        item
    }

    #[test]
    fn test_parse_date_rfc3339() {
        let date = parse_date("2026-08-25T09:15:00Z").unwrap();
        assert_eq!(date.to_rfc3339(), "2026-08-25T09:15:00+00:00");

        let offset = parse_date("2026-08-25T12:15:00+03:00").unwrap();
        assert_eq!(offset, date);
    }

    #[test]
    fn test_parse_date_plain_day() {
        let date = parse_date("2026-08-25").unwrap();
        assert_eq!(date.to_rfc3339(), "2026-08-25T00:00:00+00:00");
    }

    #[test]
    fn test_parse_date_rejects_nonsense() {
        assert!(parse_date("tomorrow").is_err());
        assert!(parse_date("2026-13-40").is_err());
    }

    #[test]
    fn test_parse_item_id_full_uuid() {
        let temp = TempDir::new().unwrap();
        let store = empty_store(&temp);

        let uuid = "a1a1a1a1-b2b2-c3c3-d4d4-e5e5e5e5e5e5";
        assert_eq!(
            parse_item_id(uuid, &store).unwrap(),
            Uuid::parse_str(uuid).unwrap()
        );
    }

    #[test]
    fn test_parse_item_id_unique_prefix() {
        let temp = TempDir::new().unwrap();
        let mut store = empty_store(&temp);

        let item = item_with_id("facefeed-0000-4000-8000-000000000001");
        let id = item.id;
        store.insert(item, 0);
        store.insert(item_with_id("00000000-0000-4000-8000-000000000002"), 0);

        assert_eq!(parse_item_id("facefeed", &store).unwrap(), id);
    }

    #[test]
    fn test_parse_item_id_ambiguous_prefix() {
        let temp = TempDir::new().unwrap();
        let mut store = empty_store(&temp);

        store.insert(item_with_id("facefeed-0000-4000-8000-000000000001"), 0);
        store.insert(item_with_id("facefeed-0000-4000-8000-000000000002"), 0);

        let err = parse_item_id("facefeed", &store).unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_parse_item_id_no_match() {
        let temp = TempDir::new().unwrap();
        let store = empty_store(&temp);

        let err = parse_item_id("deadbeef", &store).unwrap_err();
        assert!(err.to_string().contains("No item found"));
    }
}
