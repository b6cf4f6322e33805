//! Tests for CLI command handlers

use phonebook::cli::commands::entry::{
    execute_add, execute_delete, execute_get, execute_update, AddArgs, DeleteArgs, GetArgs,
    UpdateArgs,
};
use phonebook::cli::commands::{list, reindex, search, ListArgs, ReindexArgs, SearchArgs};
use phonebook::cli::OutputFormat;
use phonebook::core::types::{NewEntry, PageRequest};

use crate::common::{create_failing_services, create_test_services};

#[test]
fn test_add_then_get() {
    let (services, _temp) = create_test_services();

    execute_add(
        AddArgs {
            name: "jean-pierre".to_string(),
            phone: "1234 5678".to_string(),
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();

    let page = services.entries.list(PageRequest::new(0, 10)).unwrap();
    assert_eq!(page.items[0].name, "Jean-Pierre");

    let id = page.items[0].id;
    execute_get(GetArgs { id }, &services, OutputFormat::Human).unwrap();
}

#[test]
fn test_add_invalid_phone_fails() {
    let (services, _temp) = create_test_services();

    let result = execute_add(
        AddArgs {
            name: "Alice".to_string(),
            phone: "12".to_string(),
        },
        &services,
        OutputFormat::Human,
    );

    let err = result.unwrap_err();
    assert!(err.to_string().contains("8 digits"));
}

#[test]
fn test_get_unknown_id_fails() {
    let (services, _temp) = create_test_services();

    let err = execute_get(GetArgs { id: 5 }, &services, OutputFormat::Json).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_update_changes_entry() {
    let (services, _temp) = create_test_services();
    let entry = services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap()
        .into_value();

    execute_update(
        UpdateArgs {
            id: entry.id,
            name: "bob".to_string(),
            phone: "87654321".to_string(),
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();

    let updated = services.entries.get_by_id(entry.id).unwrap().unwrap();
    assert_eq!(updated.name, "Bob");
}

#[test]
fn test_forced_delete_removes_entry() {
    let (services, _temp) = create_test_services();
    let entry = services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap()
        .into_value();

    execute_delete(
        DeleteArgs {
            id: entry.id,
            force: true,
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();

    assert!(services.entries.get_by_id(entry.id).unwrap().is_none());
}

#[test]
fn test_delete_unknown_id_fails_before_prompt() {
    let (services, _temp) = create_test_services();

    let err = execute_delete(
        DeleteArgs {
            id: 77,
            force: false,
        },
        &services,
        OutputFormat::Human,
    )
    .unwrap_err();
    assert!(err.to_string().contains("77"));
}

#[test]
fn test_list_and_search_succeed() {
    let (services, _temp) = create_test_services();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();

    list::execute(ListArgs { page: 0, size: None }, &services, OutputFormat::Human).unwrap();
    search::execute(
        SearchArgs {
            keyword: "ali".to_string(),
            page: 0,
            size: Some(5),
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();
}

#[test]
fn test_list_rejects_zero_size() {
    let (services, _temp) = create_test_services();

    let result = list::execute(ListArgs { page: 0, size: Some(0) }, &services, OutputFormat::Json);
    assert!(result.is_err());
}

#[test]
fn test_search_rejects_invalid_keywords() {
    let (services, _temp) = create_test_services();

    let blank = search::execute(
        SearchArgs {
            keyword: "  ".to_string(),
            page: 0,
            size: None,
        },
        &services,
        OutputFormat::Human,
    );
    assert!(blank.unwrap_err().to_string().contains("cannot be empty"));

    let dangerous = search::execute(
        SearchArgs {
            keyword: "drop table".to_string(),
            page: 0,
            size: None,
        },
        &services,
        OutputFormat::Human,
    );
    assert!(dangerous.unwrap_err().to_string().contains("dangerous"));
}

#[test]
fn test_reindex_repairs_diverged_entry() {
    let (services, index) = create_failing_services();

    index.set_failing(true);
    execute_add(
        AddArgs {
            name: "Alice".to_string(),
            phone: "12345678".to_string(),
        },
        &services,
        OutputFormat::Human,
    )
    .unwrap();
    index.set_failing(false);

    let page = PageRequest::new(0, 10);
    assert!(services.entries.search_by_name_or_phone("ali", page).unwrap().is_empty());

    reindex::execute(ReindexArgs {}, &services, OutputFormat::Json).unwrap();
    assert_eq!(
        services.entries.search_by_name_or_phone("ali", page).unwrap().total_elements,
        1
    );
}

#[test]
fn test_search_and_list_far_past_the_end() {
    let (services, _temp) = create_test_services();
    services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap();

    search::execute(
        SearchArgs {
            keyword: "ali".to_string(),
            page: usize::MAX,
            size: None,
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();
    list::execute(
        ListArgs {
            page: usize::MAX,
            size: Some(100),
        },
        &services,
        OutputFormat::Json,
    )
    .unwrap();
}
