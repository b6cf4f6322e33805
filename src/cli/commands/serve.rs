//! Serve command - run the HTTP server

use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {}

/// Execute the serve command
pub async fn execute(
    _args: ServeArgs,
    services: Arc<Services>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Other commands print plain output; only the server logs
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phonebook=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    services.config.log_config();

    crate::http::serve(services).await
}
