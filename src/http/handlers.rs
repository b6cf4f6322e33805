//! JSON API handlers under `/api/phonebook`
//!
//! Path and query parameters are taken as raw strings and parsed through
//! the sanitizer so malformed input surfaces as a 400 with a readable
//! message instead of an extractor rejection.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::error::{PhonebookError, ValidationError};
use crate::core::sanitize::{sanitize_integer, sanitize_long, sanitize_search_keyword};
use crate::core::services::Services;
use crate::core::types::*;

/// Response header set when the store write succeeded but the index did not
pub const INDEX_SYNC_HEADER: HeaderName = HeaderName::from_static("x-index-sync");

/// Raw pagination parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub size: Option<String>,
}

/// Raw search parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

/// Request body for create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryRequest {
    pub phone: Option<String>,
    pub name: Option<String>,
}

impl From<EntryRequest> for NewEntry {
    fn from(req: EntryRequest) -> Self {
        NewEntry::new(req.phone.unwrap_or_default(), req.name.unwrap_or_default())
    }
}

/// Health check handler
///
/// Returns server status and version information.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create an entry
///
/// # Errors
///
/// - `Validation`: phone or name rejected (400)
/// - `Conflict`: phone already taken (409)
pub async fn create_entry(
    State(services): State<Arc<Services>>,
    Json(req): Json<EntryRequest>,
) -> Result<Response, PhonebookError> {
    let outcome = services.entries.create(req.into())?;
    Ok(sync_response(StatusCode::OK, outcome))
}

/// List entries, ordered by id
pub async fn list_entries(
    State(services): State<Arc<Services>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<PhonebookEntry>>, PhonebookError> {
    let request = resolve_page(
        &services,
        params.page.as_deref(),
        params.size.as_deref(),
        services.config.pagination.api_page_size,
    )?;

    Ok(Json(services.entries.list(request)?))
}

/// Fetch one entry
pub async fn get_entry(
    State(services): State<Arc<Services>>,
    Path(raw_id): Path<String>,
) -> Result<Json<PhonebookEntry>, PhonebookError> {
    let id = parse_id(&raw_id)?;

    services
        .entries
        .get_by_id(id)?
        .map(Json)
        .ok_or(PhonebookError::EntryNotFound(id))
}

/// Replace an existing entry
///
/// # Errors
///
/// - `EntryNotFound`: no entry with this id (404)
/// - `Validation`: phone or name rejected (400)
/// - `Conflict`: phone belongs to another entry (409)
pub async fn update_entry(
    State(services): State<Arc<Services>>,
    Path(raw_id): Path<String>,
    Json(req): Json<EntryRequest>,
) -> Result<Response, PhonebookError> {
    let id = parse_id(&raw_id)?;

    if !services.entries.exists(id)? {
        return Err(PhonebookError::EntryNotFound(id));
    }

    let outcome = services.entries.update(id, req.into())?;
    Ok(sync_response(StatusCode::OK, outcome))
}

/// Delete an entry
///
/// Returns 204 on success, 404 if the id is absent.
pub async fn delete_entry(
    State(services): State<Arc<Services>>,
    Path(raw_id): Path<String>,
) -> Result<Response, PhonebookError> {
    let id = parse_id(&raw_id)?;

    if !services.entries.exists(id)? {
        return Err(PhonebookError::EntryNotFound(id));
    }

    let outcome = services.entries.delete(id)?;
    let mut response = StatusCode::NO_CONTENT.into_response();
    mark_divergence(&mut response, outcome.is_synced());
    Ok(response)
}

/// Prefix search over name or phone
///
/// # Errors
///
/// - `Validation`: blank, dangerous or malformed keyword (400)
pub async fn search_entries(
    State(services): State<Arc<Services>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<SearchDocument>>, PhonebookError> {
    let keyword = sanitize_search_keyword(params.keyword.as_deref())?
        .ok_or(ValidationError::MissingKeyword)?;

    let request = resolve_page(
        &services,
        params.page.as_deref(),
        params.size.as_deref(),
        services.config.pagination.api_page_size,
    )?;

    Ok(Json(
        services.entries.search_by_name_or_phone(&keyword, request)?,
    ))
}

/// Parse raw page and size parameters.
///
/// Missing values fall back to page 0 and `default_size`; the size is
/// capped at the configured maximum.
pub(crate) fn resolve_page(
    services: &Services,
    page: Option<&str>,
    size: Option<&str>,
    default_size: usize,
) -> Result<PageRequest, ValidationError> {
    let page = match sanitize_integer(page)? {
        None => 0,
        Some(p) if p < 0 => {
            return Err(ValidationError::InvalidPagination(
                "page must not be negative".to_string(),
            ))
        }
        Some(p) => p as usize,
    };

    let size = match sanitize_integer(size)? {
        None => default_size,
        Some(s) if s < 1 => {
            return Err(ValidationError::InvalidPagination(
                "size must be at least 1".to_string(),
            ))
        }
        Some(s) => s as usize,
    };

    Ok(PageRequest::new(page, services.clamp_page_size(size)))
}

/// Parse an entry id from a path segment
pub(crate) fn parse_id(raw: &str) -> Result<i64, ValidationError> {
    sanitize_long(Some(raw))?.ok_or_else(|| ValidationError::NotNumeric(raw.to_string()))
}

fn sync_response<T: Serialize>(status: StatusCode, outcome: SyncOutcome<T>) -> Response {
    let synced = outcome.is_synced();
    let mut response = (status, Json(outcome.into_value())).into_response();
    mark_divergence(&mut response, synced);
    response
}

fn mark_divergence(response: &mut Response, synced: bool) {
    if !synced {
        response
            .headers_mut()
            .insert(INDEX_SYNC_HEADER, HeaderValue::from_static("diverged"));
    }
}
