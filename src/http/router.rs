//! Router assembly and server startup

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::services::Services;
use crate::http::{handlers, middleware as http_middleware, web};

/// Build the full application router: JSON API, web UI and health check
pub fn build_router(services: Arc<Services>) -> Router {
    let timeout = Duration::from_secs(services.config.limits.request_timeout_sec);

    Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_handler))
        // JSON API
        .route(
            "/api/phonebook",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/api/phonebook/search", get(handlers::search_entries))
        .route(
            "/api/phonebook/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        // Web UI
        .route("/", get(|| async { Redirect::to("/phonebook") }))
        .route("/phonebook", get(web::list_page))
        .route("/phonebook/new", get(web::new_form))
        .route("/phonebook/save", post(web::save_entry))
        .route("/phonebook/edit/:id", get(web::edit_form))
        .route("/phonebook/delete/:id", get(web::delete_entry))
        // Add middleware
        .layer(middleware::from_fn(http_middleware::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add shared state
        .with_state(services)
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(services: Arc<Services>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!(
        "{}:{}",
        services.config.server.host, services.config.server.port
    );
    let app = build_router(services);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("Service ready - Web UI at http://{}/phonebook", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
