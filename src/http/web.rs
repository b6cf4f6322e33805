//! Server-rendered web UI under `/phonebook`
//!
//! Pages are plain HTML strings. Every dynamic value goes through
//! [`escape_html`] exactly once on its way into the markup. Flash messages
//! travel across redirects as short codes in the query string.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::core::error::{PhonebookError, ValidationError};
use crate::core::sanitize::{escape_html, sanitize_name, sanitize_phone, sanitize_search_keyword};
use crate::core::services::Services;
use crate::core::types::{NewEntry, Page, PageRequest, PhonebookEntry, SearchDocument};
use crate::http::handlers::{parse_id, resolve_page};

const LIST_PATH: &str = "/phonebook";
const NEW_PATH: &str = "/phonebook/new";

/// Query parameters of the list page
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub keyword: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Flash codes carried by a redirect
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Submitted add/edit form
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// One table row, common to listings and search hits
struct Row {
    id: String,
    name: String,
    phone: String,
}

impl From<PhonebookEntry> for Row {
    fn from(entry: PhonebookEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            name: entry.name,
            phone: entry.phone,
        }
    }
}

impl From<SearchDocument> for Row {
    fn from(doc: SearchDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            phone: doc.phone,
        }
    }
}

struct Listing {
    rows: Vec<Row>,
    page: usize,
    size: usize,
    total_elements: usize,
    total_pages: usize,
    /// Trimmed keyword as typed, present only for a successful search
    keyword: Option<String>,
}

impl Listing {
    fn from_page<T: Into<Row>>(page: Page<T>, keyword: Option<String>) -> Self {
        Self {
            rows: page.items.into_iter().map(Into::into).collect(),
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            keyword,
        }
    }
}

/// List page, with optional keyword search
///
/// Invalid input is shown as an error banner above the first page of all
/// entries.
pub async fn list_page(
    State(services): State<Arc<Services>>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, PhonebookError> {
    let mut error = params.error.as_deref().and_then(flash_error);

    let listing = match load_listing(&services, &params) {
        Ok(listing) => listing,
        Err(err) => {
            tracing::warn!(error = %err, "List page falling back to first page");
            error = Some(match err.validation() {
                Some(v) => v.to_string(),
                None => format!("An error occurred: {}", err.message()),
            });
            let first = PageRequest::new(0, services.config.pagination.web_page_size);
            Listing::from_page(services.entries.list(first)?, None)
        }
    };

    let notice = params.notice.as_deref().and_then(flash_notice);
    let body = render_listing(&listing, notice.as_deref(), error.as_deref());
    Ok(layout(&services.config.app.title, &body))
}

/// Empty add form
pub async fn new_form(
    State(services): State<Arc<Services>>,
    Query(flash): Query<FlashParams>,
) -> Html<String> {
    let error = flash.error.as_deref().and_then(flash_error);
    let body = render_form("Add Entry", None, error.as_deref());
    layout(&services.config.app.title, &body)
}

/// Edit form for an existing entry
pub async fn edit_form(
    State(services): State<Arc<Services>>,
    Path(raw_id): Path<String>,
    Query(flash): Query<FlashParams>,
) -> Result<Response, PhonebookError> {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(_) => return Ok(flash_redirect(LIST_PATH, "error", "invalid_id").into_response()),
    };

    let Some(entry) = services.entries.get_by_id(id)? else {
        return Ok(flash_redirect(LIST_PATH, "error", "not_found").into_response());
    };

    let error = flash.error.as_deref().and_then(flash_error);
    let body = render_form("Edit Entry", Some(&entry), error.as_deref());
    Ok(layout(&services.config.app.title, &body).into_response())
}

/// Create or update from the submitted form
///
/// A non-blank `id` field selects update. Failures send the user back to
/// the form they came from with an error code.
pub async fn save_entry(
    State(services): State<Arc<Services>>,
    Form(form): Form<EntryForm>,
) -> Redirect {
    let id = match form.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match parse_id(raw) {
            Ok(id) => Some(id),
            Err(_) => return flash_redirect(LIST_PATH, "error", "invalid_id"),
        },
    };

    let form_path = match id {
        Some(id) => format!("/phonebook/edit/{id}"),
        None => NEW_PATH.to_string(),
    };

    let candidate = match sanitize_form(&form) {
        Ok(candidate) => candidate,
        Err(err) => return flash_redirect(&form_path, "error", err.code()),
    };

    let result = match id {
        Some(id) => services.entries.update(id, candidate).map(|o| o.is_synced()),
        None => services.entries.create(candidate).map(|o| o.is_synced()),
    };

    match result {
        Ok(_) => flash_redirect(LIST_PATH, "notice", "saved"),
        Err(err) if err.is_not_found() => flash_redirect(LIST_PATH, "error", "not_found"),
        Err(err) => {
            tracing::warn!(error = %err, "Saving entry from web form failed");
            flash_redirect(&form_path, "error", error_code(&err, "save_failed"))
        }
    }
}

/// Delete and return to the list
pub async fn delete_entry(
    State(services): State<Arc<Services>>,
    Path(raw_id): Path<String>,
) -> Redirect {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(_) => return flash_redirect(LIST_PATH, "error", "invalid_id"),
    };

    match services.entries.exists(id) {
        Ok(true) => {}
        Ok(false) => return flash_redirect(LIST_PATH, "error", "not_found"),
        Err(err) => {
            tracing::warn!(error = %err, id, "Existence check before delete failed");
            return flash_redirect(LIST_PATH, "error", "delete_failed");
        }
    }

    match services.entries.delete(id) {
        Ok(_) => flash_redirect(LIST_PATH, "notice", "deleted"),
        Err(err) => {
            tracing::warn!(error = %err, id, "Deleting entry from web UI failed");
            flash_redirect(LIST_PATH, "error", error_code(&err, "delete_failed"))
        }
    }
}

fn load_listing(services: &Services, params: &ListParams) -> Result<Listing, PhonebookError> {
    let request = resolve_page(
        services,
        params.page.as_deref(),
        params.size.as_deref(),
        services.config.pagination.web_page_size,
    )?;

    match sanitize_search_keyword(params.keyword.as_deref())? {
        Some(keyword) => {
            let hits = services.entries.search_by_name_or_phone(&keyword, request)?;
            let typed = params.keyword.as_deref().map(|k| k.trim().to_string());
            Ok(Listing::from_page(hits, typed))
        }
        None => Ok(Listing::from_page(services.entries.list(request)?, None)),
    }
}

fn sanitize_form(form: &EntryForm) -> Result<NewEntry, ValidationError> {
    let name = sanitize_name(form.name.as_deref().unwrap_or_default())?;
    let phone = sanitize_phone(form.phone.as_deref().unwrap_or_default())?;
    Ok(NewEntry::new(phone, name))
}

fn error_code(err: &PhonebookError, fallback: &'static str) -> &'static str {
    match err {
        PhonebookError::Validation(v) => v.code(),
        PhonebookError::EntryNotFound(_) => "not_found",
        PhonebookError::Conflict(_) => "conflict",
        _ => fallback,
    }
}

fn flash_redirect(path: &str, key: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{path}?{key}={code}"))
}

/// Resolve a notice code to its message
pub fn flash_notice(code: &str) -> Option<String> {
    let message = match code {
        "saved" => "Entry saved successfully",
        "deleted" => "Entry deleted successfully",
        _ => return None,
    };
    Some(message.to_string())
}

/// Resolve an error code to its message. Unknown codes are dropped.
pub fn flash_error(code: &str) -> Option<String> {
    let message = match code {
        "invalid_phone" => ValidationError::InvalidPhone.to_string(),
        "empty_name" => ValidationError::EmptyName.to_string(),
        "invalid_name" => ValidationError::InvalidName.to_string(),
        "invalid_id" => "Invalid entry id".to_string(),
        "not_found" => "Entry not found".to_string(),
        "conflict" => "An entry with this phone number already exists".to_string(),
        "save_failed" => "Could not save entry".to_string(),
        "delete_failed" => "Could not delete entry".to_string(),
        _ => return None,
    };
    Some(message)
}

fn list_href(page: usize, size: usize, keyword: Option<&str>) -> String {
    let mut href = format!("{LIST_PATH}?page={page}&size={size}");
    if let Some(keyword) = keyword {
        href.push_str("&keyword=");
        href.push_str(&urlencoding::encode(keyword));
    }
    href
}

fn layout(title: &str, body: &str) -> Html<String> {
    let title = escape_html(title);
    Html(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1><a href=\"{LIST_PATH}\">{title}</a></h1>\n\
         {body}\
         </body>\n\
         </html>\n"
    ))
}

fn render_flash(out: &mut String, notice: Option<&str>, error: Option<&str>) {
    if let Some(notice) = notice {
        let _ = writeln!(out, "<p class=\"notice\">{}</p>", escape_html(notice));
    }
    if let Some(error) = error {
        let _ = writeln!(out, "<p class=\"error\">{}</p>", escape_html(error));
    }
}

fn render_listing(listing: &Listing, notice: Option<&str>, error: Option<&str>) -> String {
    let mut out = String::new();
    render_flash(&mut out, notice, error);

    let keyword_value = listing.keyword.as_deref().map(escape_html).unwrap_or_default();
    let _ = writeln!(
        out,
        "<form method=\"get\" action=\"{LIST_PATH}\">\n\
         <input type=\"text\" name=\"keyword\" value=\"{keyword_value}\" placeholder=\"Name or phone\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>"
    );
    let _ = writeln!(out, "<p><a href=\"{NEW_PATH}\">Add entry</a></p>");

    if listing.rows.is_empty() {
        out.push_str("<p class=\"empty\">No entries found</p>\n");
    } else {
        out.push_str("<table>\n<tr><th>Name</th><th>Phone</th><th></th></tr>\n");
        for row in &listing.rows {
            let id = escape_html(&row.id);
            let _ = writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>\
                 <a href=\"/phonebook/edit/{id}\">Edit</a> \
                 <a href=\"/phonebook/delete/{id}\">Delete</a></td></tr>",
                escape_html(&row.name),
                escape_html(&row.phone),
            );
        }
        out.push_str("</table>\n");
    }

    let _ = writeln!(
        out,
        "<p class=\"pagination\">Page {} of {} ({} entries)",
        listing.page + 1,
        listing.total_pages.max(1),
        listing.total_elements
    );
    let keyword = listing.keyword.as_deref();
    if listing.page > 0 {
        let href = escape_html(&list_href(listing.page - 1, listing.size, keyword));
        let _ = writeln!(out, "<a href=\"{href}\">Previous</a>");
    }
    if listing.page + 1 < listing.total_pages {
        let href = escape_html(&list_href(listing.page + 1, listing.size, keyword));
        let _ = writeln!(out, "<a href=\"{href}\">Next</a>");
    }
    out.push_str("</p>\n");

    out
}

fn render_form(heading: &str, entry: Option<&PhonebookEntry>, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(heading));
    render_flash(&mut out, None, error);

    let _ = writeln!(out, "<form method=\"post\" action=\"/phonebook/save\">");
    if let Some(entry) = entry {
        let _ = writeln!(
            out,
            "<input type=\"hidden\" name=\"id\" value=\"{}\">",
            entry.id
        );
    }
    let name = entry.map(|e| escape_html(&e.name)).unwrap_or_default();
    let phone = entry.map(|e| escape_html(&e.phone)).unwrap_or_default();
    let _ = writeln!(
        out,
        "<label>Name <input type=\"text\" name=\"name\" value=\"{name}\"></label>\n\
         <label>Phone <input type=\"text\" name=\"phone\" value=\"{phone}\"></label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n\
         <p><a href=\"{LIST_PATH}\">Back to list</a></p>"
    );

    out
}
