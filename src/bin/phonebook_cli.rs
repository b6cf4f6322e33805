//! Phonebook CLI - manage entries from the command line
//!
//! # Examples
//!
//! ```bash
//! # Add an entry
//! phonebook add --name "jean-pierre" --phone "1234-5678"
//!
//! # Search by name or phone prefix
//! phonebook search jean
//!
//! # Repair the search index after a failed write
//! phonebook reindex
//!
//! # Run the web UI and JSON API
//! phonebook serve
//! ```

use clap::Parser;
use phonebook::cli::{output::print_error, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
