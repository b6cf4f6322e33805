//! Store and index surviving a restart

use phonebook::core::services::Services;
use phonebook::core::types::{NewEntry, PageRequest};
use tempfile::TempDir;

use crate::common::helpers::temp_config;

#[test]
fn test_entries_and_index_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let id = {
        let services = Services::new(temp_config(&temp_dir)).unwrap();
        services
            .entries
            .create(NewEntry::new("12345678", "jean-pierre"))
            .unwrap()
            .into_value()
            .id
    };

    let services = Services::new(temp_config(&temp_dir)).unwrap();
    let entry = services.entries.get_by_id(id).unwrap().unwrap();
    assert_eq!(entry.name, "Jean-Pierre");

    let hits = services
        .entries
        .search_by_name_or_phone("jean", PageRequest::new(0, 10))
        .unwrap();
    assert_eq!(hits.total_elements, 1);
}

#[test]
fn test_ids_not_reused_after_delete_and_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let first_id = {
        let services = Services::new(temp_config(&temp_dir)).unwrap();
        let id = services
            .entries
            .create(NewEntry::new("12345678", "Alice"))
            .unwrap()
            .into_value()
            .id;
        services.entries.delete(id).unwrap();
        id
    };

    let services = Services::new(temp_config(&temp_dir)).unwrap();
    let second = services
        .entries
        .create(NewEntry::new("12345678", "Alice"))
        .unwrap()
        .into_value();
    assert!(second.id > first_id);
}

#[test]
fn test_reindex_rebuilds_deleted_index_directory() {
    let temp_dir = TempDir::new().unwrap();

    {
        let services = Services::new(temp_config(&temp_dir)).unwrap();
        services
            .entries
            .create(NewEntry::new("12345678", "Alice"))
            .unwrap();
        services
            .entries
            .create(NewEntry::new("87654321", "Bob"))
            .unwrap();
    }

    std::fs::remove_dir_all(temp_dir.path().join("index")).unwrap();

    let services = Services::new(temp_config(&temp_dir)).unwrap();
    let page = PageRequest::new(0, 10);
    assert!(services.entries.search_by_name_or_phone("ali", page).unwrap().is_empty());

    assert_eq!(services.entries.reindex().unwrap(), 2);
    assert_eq!(
        services.entries.search_by_name_or_phone("ali", page).unwrap().total_elements,
        1
    );
}
