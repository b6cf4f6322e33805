//! Integration tests for the server-rendered web UI

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use phonebook::core::types::{NewEntry, PageRequest};
use tower::ServiceExt as TowerServiceExt;

use crate::common::{create_test_app, read_body};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/phonebook/save")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_list() {
    let (app, _services, _temp) = create_test_app();

    let response = app.oneshot(get("/")).await.unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/phonebook");
}

#[tokio::test]
async fn test_empty_list_page() {
    let (app, _services, _temp) = create_test_app();

    let response = app.oneshot(get("/phonebook")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_body(response).await;
    assert!(html.contains("<title>Phonebook</title>"));
    assert!(html.contains("No entries found"));
}

#[tokio::test]
async fn test_save_new_entry_redirects_with_notice() {
    let (app, services, _temp) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_form("name=o%27connor&phone=1234-5678"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/phonebook?notice=saved");

    let page = services.entries.list(PageRequest::new(0, 10)).unwrap();
    assert_eq!(page.total_elements, 1);
    assert_eq!(page.items[0].name, "O'Connor");

    let response = app.oneshot(get("/phonebook?notice=saved")).await.unwrap();
    let html = read_body(response).await;
    assert!(html.contains("Entry saved successfully"));
    assert!(html.contains("O&#x27;Connor"));
    assert!(html.contains("12345678"));
}

#[tokio::test]
async fn test_save_invalid_phone_returns_to_form() {
    let (app, services, _temp) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_form("name=Alice&phone=123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/phonebook/new?error=invalid_phone");
    assert_eq!(services.entries.list(PageRequest::new(0, 10)).unwrap().total_elements, 0);

    let response = app
        .oneshot(get("/phonebook/new?error=invalid_phone"))
        .await
        .unwrap();
    let html = read_body(response).await;
    assert!(html.contains("Phone number must be exactly 8 digits"));
}

#[tokio::test]
async fn test_save_duplicate_phone_reports_conflict() {
    let (app, services, _temp) = create_test_app();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();

    let response = app
        .oneshot(post_form("name=Bob&phone=12345678"))
        .await
        .unwrap();
    assert_eq!(location(&response), "/phonebook/new?error=conflict");
}

#[tokio::test]
async fn test_edit_and_update_existing_entry() {
    let (app, services, _temp) = create_test_app();
    let entry = services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap()
        .into_value();

    let response = app
        .clone()
        .oneshot(get(&format!("/phonebook/edit/{}", entry.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = read_body(response).await;
    assert!(html.contains(&format!("name=\"id\" value=\"{}\"", entry.id)));
    assert!(html.contains("value=\"Alice\""));

    let response = app
        .clone()
        .oneshot(post_form(&format!(
            "id={}&name=alicia&phone=87654321",
            entry.id
        )))
        .await
        .unwrap();
    assert_eq!(location(&response), "/phonebook?notice=saved");

    let updated = services.entries.get_by_id(entry.id).unwrap().unwrap();
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.phone, "87654321");

    // Validation failure on edit goes back to the edit form
    let response = app
        .oneshot(post_form(&format!("id={}&name=&phone=87654321", entry.id)))
        .await
        .unwrap();
    assert_eq!(
        location(&response),
        format!("/phonebook/edit/{}?error=empty_name", entry.id)
    );
}

#[tokio::test]
async fn test_edit_invalid_or_unknown_id_redirects() {
    let (app, _services, _temp) = create_test_app();

    let response = app.clone().oneshot(get("/phonebook/edit/abc")).await.unwrap();
    assert_eq!(location(&response), "/phonebook?error=invalid_id");

    let response = app.oneshot(get("/phonebook/edit/999")).await.unwrap();
    assert_eq!(location(&response), "/phonebook?error=not_found");
}

#[tokio::test]
async fn test_delete_flow() {
    let (app, services, _temp) = create_test_app();
    let entry = services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap()
        .into_value();

    let response = app
        .clone()
        .oneshot(get(&format!("/phonebook/delete/{}", entry.id)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/phonebook?notice=deleted");
    assert!(services.entries.get_by_id(entry.id).unwrap().is_none());

    let response = app
        .oneshot(get(&format!("/phonebook/delete/{}", entry.id)))
        .await
        .unwrap();
    assert_eq!(location(&response), "/phonebook?error=not_found");
}

#[tokio::test]
async fn test_keyword_search_on_list_page() {
    let (app, services, _temp) = create_test_app();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();
    services
        .entries
        .create(NewEntry::new("87654321", "Bob"))
        .unwrap();

    let response = app.oneshot(get("/phonebook?keyword=ali")).await.unwrap();
    let html = read_body(response).await;

    assert!(html.contains("Alice"));
    assert!(!html.contains("Bob"));
    assert!(html.contains("value=\"ali\""));
}

#[tokio::test]
async fn test_invalid_keyword_shows_error_and_first_page() {
    let (app, services, _temp) = create_test_app();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();

    let response = app
        .oneshot(get("/phonebook?keyword=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_body(response).await;
    assert!(html.contains("potentially dangerous content"));
    assert!(html.contains("Alice"));
    assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn test_list_pagination_links() {
    let (app, services, _temp) = create_test_app();
    for i in 0..7 {
        services
            .entries
            .create(NewEntry::new(format!("2000000{i}"), "Person"))
            .unwrap();
    }

    let response = app.clone().oneshot(get("/phonebook")).await.unwrap();
    let html = read_body(response).await;
    assert!(html.contains("Page 1 of 2 (7 entries)"));
    assert!(html.contains("Next"));
    assert!(!html.contains("Previous"));

    let response = app.oneshot(get("/phonebook?page=1")).await.unwrap();
    let html = read_body(response).await;
    assert!(html.contains("Page 2 of 2 (7 entries)"));
    assert!(html.contains("Previous"));
}

#[tokio::test]
async fn test_search_page_far_past_the_end_renders() {
    let (app, services, _temp) = create_test_app();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();

    let response = app
        .oneshot(get("/phonebook?keyword=ali&page=2147483647"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_body(response).await;
    assert!(html.contains("No entries found"));
    assert!(html.contains("Previous"));
}
