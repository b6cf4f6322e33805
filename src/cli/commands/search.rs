//! Search command - prefix search over name or phone

use crate::cli::output::{colors, format_entry_row, format_page_summary};
use crate::cli::OutputFormat;
use crate::core::error::ValidationError;
use crate::core::sanitize::sanitize_search_keyword;
use crate::core::services::Services;
use crate::core::types::PageRequest;
use clap::Args;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Name or phone prefix (letters, digits, spaces, hyphens, apostrophes)
    pub keyword: String,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Page size (defaults to the configured API page size)
    #[arg(long)]
    pub size: Option<usize>,
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let keyword = sanitize_search_keyword(Some(args.keyword.as_str()))?
        .ok_or(ValidationError::MissingKeyword)?;

    let size = args
        .size
        .unwrap_or(services.config.pagination.api_page_size);
    if size == 0 {
        return Err("Page size must be at least 1".into());
    }

    let request = PageRequest::new(args.page, services.clamp_page_size(size));
    let hits = services.entries.search_by_name_or_phone(&keyword, request)?;

    match format {
        OutputFormat::Human => {
            if hits.is_empty() {
                println!(
                    "No entries match '{}'.",
                    colors::label(args.keyword.trim())
                );
            } else {
                println!(
                    "{} for '{}' ({}):",
                    colors::label("Matches"),
                    args.keyword.trim(),
                    colors::number(&hits.total_elements.to_string())
                );
                for doc in &hits.items {
                    println!("{}", format_entry_row(&doc.id, &doc.name, &doc.phone));
                }
                println!("{}", colors::dim(&format_page_summary(&hits)));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
    }

    Ok(())
}
