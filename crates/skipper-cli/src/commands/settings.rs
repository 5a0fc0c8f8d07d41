//! Settings command handlers
//!
//! Settings are small string preferences stored alongside the item data:
//! the display name, the selected tab and the appearance override.

use anyhow::{bail, Result};

use skipper_core::settings::{APPEARANCE_KEY, NAME_KEY, TAB_KEY};
use skipper_core::ItemStore;

use crate::output::{Output, OutputFormat};

/// Show current settings
pub fn show(store: &ItemStore, output: &Output) -> Result<()> {
    let settings = store.settings();
    let appearance = if settings.appearance().is_empty() {
        "system"
    } else {
        settings.appearance()
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "name": settings.name(),
                    "tab": settings.tab(),
                    "appearance": appearance
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", settings.name());
        }
        OutputFormat::Human => {
            println!("Settings:");
            println!("  name:       {}", settings.name());
            println!("  tab:        {}", settings.tab());
            println!("  appearance: {}", appearance);
            println!();
            println!("Settings file: {}", settings.path().display());
        }
    }

    Ok(())
}

/// Set a settings value
pub fn set(store: &mut ItemStore, key: String, value: String, output: &Output) -> Result<()> {
    match key.as_str() {
        "name" => {
            store.settings_mut().set(NAME_KEY, value.clone());
        }
        "tab" => match value.as_str() {
            "welcome" | "home" | "settings" => {
                store.settings_mut().set(TAB_KEY, value.clone());
            }
            _ => {
                bail!(
                    "Invalid tab: '{}'\n\
                     Valid tabs: welcome, home, settings",
                    value
                );
            }
        },
        "appearance" => {
            // Empty string means follow the system appearance
            let stored = match value.as_str() {
                "system" | "" => "",
                "light" => "light",
                "dark" => "dark",
                _ => {
                    bail!(
                        "Invalid appearance: '{}'\n\
                         Valid values: system, light, dark",
                        value
                    );
                }
            };
            store.settings_mut().set(APPEARANCE_KEY, stored);
        }
        _ => {
            bail!(
                "Unknown settings key: '{}'\n\
                 Valid keys: name, tab, appearance",
                key
            );
        }
    }

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skipper_core::Config;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> ItemStore {
        let config = Config {
            data_dir: temp.path().to_path_buf(),
            log_file: None,
        };
        ItemStore::open_with_config(config)
    }

    #[test]
    fn test_set_validates_tab() {
        let temp = TempDir::new().unwrap();
        let mut store = test_store(&temp);
        let output = Output::new(OutputFormat::Quiet);

        assert!(set(&mut store, "tab".into(), "home".into(), &output).is_ok());
        assert_eq!(store.settings().tab(), "home");

        assert!(set(&mut store, "tab".into(), "profile".into(), &output).is_err());
        assert_eq!(store.settings().tab(), "home");
    }

    #[test]
    fn test_set_appearance_system_stores_empty() {
        let temp = TempDir::new().unwrap();
        let mut store = test_store(&temp);
        let output = Output::new(OutputFormat::Quiet);

        set(&mut store, "appearance".into(), "dark".into(), &output).unwrap();
        assert_eq!(store.settings().appearance(), "dark");

        set(&mut store, "appearance".into(), "system".into(), &output).unwrap();
        assert_eq!(store.settings().get(APPEARANCE_KEY), Some(""));
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        let mut store = test_store(&temp);
        let output = Output::new(OutputFormat::Quiet);

        let err = set(&mut store, "theme".into(), "x".into(), &output).unwrap_err();
        assert!(err.to_string().contains("Unknown settings key"));
    }
}
