//! List command - page through entries

use crate::cli::output::{colors, format_entry_row, format_page_summary};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::PageRequest;
use clap::Args;
use std::sync::Arc;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Page size (defaults to the configured API page size)
    #[arg(long)]
    pub size: Option<usize>,
}

/// Execute the list command
pub fn execute(
    args: ListArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = args
        .size
        .unwrap_or(services.config.pagination.api_page_size);
    if size == 0 {
        return Err("Page size must be at least 1".into());
    }

    let request = PageRequest::new(args.page, services.clamp_page_size(size));
    let page = services.entries.list(request)?;

    match format {
        OutputFormat::Human => {
            if page.is_empty() {
                println!(
                    "No entries found. Run '{}' to add one.",
                    colors::label("phonebook add --name <name> --phone <phone>")
                );
            } else {
                println!(
                    "{} ({}):",
                    colors::label("Entries"),
                    colors::number(&page.total_elements.to_string())
                );
                for entry in &page.items {
                    println!(
                        "{}",
                        format_entry_row(&entry.id.to_string(), &entry.name, &entry.phone)
                    );
                }
                println!("{}", colors::dim(&format_page_summary(&page)));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
    }

    Ok(())
}
