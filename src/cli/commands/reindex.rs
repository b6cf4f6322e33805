//! Reindex command - rebuild the search index from the database

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the reindex command
#[derive(Args, Debug)]
pub struct ReindexArgs {}

/// Reindex result
#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub documents: usize,
    pub duration_ms: u128,
}

/// Execute the reindex command
pub fn execute(
    _args: ReindexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let documents = services.entries.reindex()?;

    let response = ReindexResponse {
        documents,
        duration_ms: start.elapsed().as_millis(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents in {}ms",
                colors::success("Reindexed"),
                colors::number(&response.documents.to_string()),
                colors::number(&response.duration_ms.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
