//! Config command - show current configuration

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    #[serde(flatten)]
    pub config: Config,
}

/// Execute the config command
pub fn execute(
    _args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        config: config.clone(),
    };

    match format {
        OutputFormat::Human => {
            println!("{}", colors::label("Configuration:"));
            println!("  config_file: {}", response.config_file);
            println!("  server:");
            println!("    host: {}", config.server.host);
            println!("    port: {}", config.server.port);
            println!("  storage:");
            println!("    database_path: {}", config.storage.database_path.display());
            println!("    index_dir: {}", config.storage.index_dir.display());
            println!("  pagination:");
            println!("    api_page_size: {}", config.pagination.api_page_size);
            println!("    web_page_size: {}", config.pagination.web_page_size);
            println!("    max_page_size: {}", config.pagination.max_page_size);
            println!("  app:");
            println!("    title: {}", config.app.title);
            println!("  limits:");
            println!(
                "    request_timeout_sec: {}",
                config.limits.request_timeout_sec
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
