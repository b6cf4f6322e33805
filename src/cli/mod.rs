//! CLI adapter for the phonebook
//!
//! Manages entries directly against the configured store and index, and
//! can start the HTTP server.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |<-----|      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Phonebook - contact management
///
/// Store names and 8-digit phone numbers, search them by name or phone
/// prefix, and serve them over a JSON API and web UI.
#[derive(Parser, Debug)]
#[command(name = "phonebook")]
#[command(version)]
#[command(about = "Phonebook contact management", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output for scripting
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Human
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (JSON API and web UI)
    Serve(commands::ServeArgs),

    /// Add a new entry
    Add(commands::entry::AddArgs),

    /// Show one entry
    Get(commands::entry::GetArgs),

    /// List entries ordered by id
    List(commands::ListArgs),

    /// Replace the name and phone of an existing entry
    Update(commands::entry::UpdateArgs),

    /// Delete an entry
    Delete(commands::entry::DeleteArgs),

    /// Search entries by name or phone prefix
    Search(commands::SearchArgs),

    /// Rebuild the search index from the database
    Reindex(commands::ReindexArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  phonebook completions bash > ~/.local/share/bash-completion/completions/phonebook
    ///   zsh:   phonebook completions zsh > ~/.zfunc/_phonebook
    ///   fish:  phonebook completions fish > ~/.config/fish/completions/phonebook.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Initialize XDG directories
    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    // Load configuration
    let config = Config::load_with_xdg(&xdg)?;

    // show-config reports configuration without opening storage
    if let Commands::ShowConfig(args) = cli.command {
        return commands::config::execute(args, &config, &xdg, cli.format);
    }

    // Create services
    let services = Arc::new(Services::new(config)?);

    // Execute command
    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, services).await,
        Commands::Add(args) => commands::entry::execute_add(args, &services, cli.format),
        Commands::Get(args) => commands::entry::execute_get(args, &services, cli.format),
        Commands::List(args) => commands::list::execute(args, &services, cli.format),
        Commands::Update(args) => commands::entry::execute_update(args, &services, cli.format),
        Commands::Delete(args) => commands::entry::execute_delete(args, &services, cli.format),
        Commands::Search(args) => commands::search::execute(args, &services, cli.format),
        Commands::Reindex(args) => commands::reindex::execute(args, &services, cli.format),
        Commands::ShowConfig(_) | Commands::Completions(_) => unreachable!(), // Handled above
    }
}
