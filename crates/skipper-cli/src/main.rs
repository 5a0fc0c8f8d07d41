//! skipper CLI
//!
//! Command-line interface for skipper - a local-first to-do list.

use std::fs::File;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use skipper_core::{Config, ItemStore};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "skipper")]
#[command(about = "Skipper - Local-first to-do list management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List items
    #[command(alias = "ls")]
    List {
        /// Show only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Add a new item
    Add {
        /// Item title (untitled items display their date)
        title: Option<String>,
        /// Notes text
        #[arg(short, long)]
        notes: Option<String>,
        /// Item date, RFC 3339 or YYYY-MM-DD (defaults to now)
        #[arg(short, long)]
        date: Option<String>,
        /// Mark as favorite
        #[arg(short, long)]
        favorite: bool,
        /// Position to insert at (default: top of the list)
        #[arg(long, default_value_t = 0)]
        at: usize,
    },
    /// Show item details (including notes)
    Show {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Edit an item
    Edit {
        /// Item ID (full UUID or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New notes text
        #[arg(short, long)]
        notes: Option<String>,
        /// New date, RFC 3339 or YYYY-MM-DD
        #[arg(short, long)]
        date: Option<String>,
        /// Set or clear the favorite flag
        #[arg(short, long)]
        favorite: Option<bool>,
    },
    /// Delete items
    #[command(alias = "rm")]
    Delete {
        /// Item IDs (full UUID or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Move items to a new position
    #[command(alias = "mv")]
    Move {
        /// Item IDs (full UUID or prefix)
        #[arg(required = true)]
        ids: Vec<String>,
        /// Destination position, counted before the items are removed
        #[arg(long)]
        to: usize,
    },
    /// Remove all items
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (data location, counts)
    Status,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set a settings value
    Set {
        /// Settings key (name, tab, appearance)
        key: String,
        /// Settings value
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load()?;
    init_logging(&config);

    // Open store for commands that need it
    let mut store = ItemStore::open_with_config(config);

    match cli.command.unwrap_or(Commands::List { favorites: false }) {
        Commands::List { favorites } => commands::item::list(&store, favorites, &output),
        Commands::Add {
            title,
            notes,
            date,
            favorite,
            at,
        } => commands::item::add(&mut store, title, notes, date, favorite, at, &output),
        Commands::Show { id } => commands::item::show(&store, id, &output),
        Commands::Edit {
            id,
            title,
            notes,
            date,
            favorite,
        } => commands::item::edit(&mut store, id, title, notes, date, favorite, &output),
        Commands::Delete { ids, yes } => commands::item::delete(&mut store, ids, yes, &output),
        Commands::Move { ids, to } => commands::item::move_items(&mut store, ids, to, &output),
        Commands::Clear { yes } => commands::item::clear(&mut store, yes, &output),
        Commands::Settings { command } => handle_settings_command(command, &mut store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Status => commands::status::show(&store, &output),
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    store: &mut ItemStore,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(store, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(store, key, value, output)
        }
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Initialize logging
///
/// Only initializes if SKIPPER_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    // Only log if SKIPPER_LOG is set
    let Ok(log_level) = std::env::var("SKIPPER_LOG") else {
        return;
    };

    // Determine log file path
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(|| config.data_dir.join("debug.log"));

    // Create log file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("skipper_core={},skipper={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
