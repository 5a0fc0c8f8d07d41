//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use skipper_core::Item;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single item in full
    pub fn print_item(&self, item: &Item) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", item.id);
                println!("Title:    {}", item.item_title());
                println!("Date:     {}", item.date_time_string());
                println!("Favorite: {}", if item.favorite { "yes" } else { "no" });

                if !item.notes.is_empty() {
                    println!();
                    println!("── Notes ──");
                    println!("{}", item.notes);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(item).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", item.id);
            }
        }
    }

    /// Print a list of items with their positions
    pub fn print_items(&self, items: &[(usize, &Item)]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for (position, item) in items {
                    let marker = if item.favorite { "★" } else { " " };
                    println!(
                        "{:>3}  {} {} {} | {}",
                        position,
                        &item.id.to_string()[..8],
                        marker,
                        truncate(&item.item_title(), 40),
                        item.date_string()
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                let rows: Vec<_> = items
                    .iter()
                    .map(|(position, item)| {
                        serde_json::json!({
                            "position": position,
                            "id": item.id,
                            "date": item.date,
                            "favorite": item.favorite,
                            "title": item.title,
                            "notes": item.notes
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows).unwrap());
            }
            OutputFormat::Quiet => {
                for (_, item) in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to at most `max_len` bytes, adding "..." if truncated
///
/// The cut backs up to a char boundary, so multibyte text shortens a
/// little further rather than splitting a character.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
