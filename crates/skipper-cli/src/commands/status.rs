//! Status command handler

use anyhow::Result;

use skipper_core::ItemStore;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &ItemStore, output: &Output) -> Result<()> {
    let stats = store.stats();
    let config = store.config();
    let favorites = store.items().iter().filter(|item| item.favorite).count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "name": store.name(),
                    "storage": {
                        "data_dir": config.data_dir,
                        "items_exists": stats.items_exists,
                        "settings_exists": stats.settings_exists,
                        "items_size": stats.items_size,
                        "settings_size": stats.settings_size,
                        "total_size": stats.total_size()
                    },
                    "counts": {
                        "items": store.len(),
                        "favorites": favorites
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Skipper Status");
            println!("==============");
            println!();
            println!("Name: {}", store.name());
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", stats.total_size_human());
            if !stats.items_exists {
                println!("  Items have not been written yet");
            }
            println!();
            println!("Contents:");
            println!("  Items:     {}", store.len());
            println!("  Favorites: {}", favorites);
        }
    }

    Ok(())
}
