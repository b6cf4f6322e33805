//! Entry commands - add, get, update, delete

use crate::cli::output::{colors, print_warning};
use crate::cli::OutputFormat;
use crate::core::error::PhonebookError;
use crate::core::services::Services;
use crate::core::types::{NewEntry, PhonebookEntry, SyncOutcome};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Arguments for add
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Contact name (letters, spaces, hyphens, apostrophes)
    #[arg(long, short = 'n')]
    pub name: String,

    /// Phone number, 8 digits after removing separators
    #[arg(long, short = 'p')]
    pub phone: String,
}

/// Arguments for get
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Entry ID
    pub id: i64,
}

/// Arguments for update
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Entry ID
    pub id: i64,

    /// New contact name
    #[arg(long, short = 'n')]
    pub name: String,

    /// New phone number
    #[arg(long, short = 'p')]
    pub phone: String,
}

/// Arguments for delete
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Entry ID
    pub id: i64,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Result of a write, with the index sync state
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub entry: PhonebookEntry,
    pub index_synced: bool,
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub id: i64,
    pub index_synced: bool,
}

/// Execute add command
pub fn execute_add(
    args: AddArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = services
        .entries
        .create(NewEntry::new(args.phone, args.name))?;

    report_write("Added", outcome, format)
}

/// Execute get command
pub fn execute_get(
    args: GetArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let entry = services
        .entries
        .get_by_id(args.id)?
        .ok_or(PhonebookError::EntryNotFound(args.id))?;

    match format {
        OutputFormat::Human => print_entry(&entry),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
    }

    Ok(())
}

/// Execute update command
pub fn execute_update(
    args: UpdateArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = services
        .entries
        .update(args.id, NewEntry::new(args.phone, args.name))?;

    report_write("Updated", outcome, format)
}

/// Execute delete command
pub fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let entry = services
        .entries
        .get_by_id(args.id)?
        .ok_or(PhonebookError::EntryNotFound(args.id))?;

    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Delete entry {} ({}, {})? [y/N] ",
            colors::entry_id(&entry.id.to_string()),
            entry.name,
            colors::phone(&entry.phone)
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    let outcome = services.entries.delete(args.id)?;
    let response = DeleteResponse {
        status: "deleted".to_string(),
        id: args.id,
        index_synced: outcome.is_synced(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} entry {}",
                colors::success("Deleted"),
                colors::entry_id(&args.id.to_string())
            );
            warn_if_diverged(&outcome);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn report_write(
    verb: &str,
    outcome: SyncOutcome<PhonebookEntry>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            println!("{} entry:", colors::success(verb));
            print_entry(outcome.value());
            warn_if_diverged(&outcome);
        }
        OutputFormat::Json => {
            let response = WriteResponse {
                index_synced: outcome.is_synced(),
                entry: outcome.into_value(),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn print_entry(entry: &PhonebookEntry) {
    println!("  {}  {}", colors::label("ID:   "), colors::entry_id(&entry.id.to_string()));
    println!("  {}  {}", colors::label("Name: "), entry.name);
    println!("  {}  {}", colors::label("Phone:"), colors::phone(&entry.phone));
}

fn warn_if_diverged<T>(outcome: &SyncOutcome<T>) {
    if let Some(err) = outcome.index_error() {
        print_warning(&format!(
            "search index not updated ({err}). Run 'phonebook reindex' to repair."
        ));
    }
}
