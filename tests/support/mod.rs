#![allow(dead_code)]

use medialib::db::{Database, DbMediaItem, NewMediaItem};
use medialib::library::LibraryManager;
use medialib::store::{MediaStore, MemoryStore};
use tempfile::TempDir;

pub const TEST_VAULT_PIN: &str = "1234";

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Media item with a fixed id
pub fn media_item(id: &str, url: &str) -> DbMediaItem {
    let mut item = NewMediaItem::new(&format!("Item {}", id), url).into_record();
    item.id = id.to_string();
    item
}

async fn insert_items(store: &dyn MediaStore, items: &[(&str, &str)]) {
    for (id, url) in items {
        store
            .insert_media_with_id(media_item(id, url))
            .await
            .expect("Failed to insert media item");
    }
}

/// In-memory manager preloaded with (id, url) media items
pub async fn memory_library(items: &[(&str, &str)]) -> LibraryManager {
    tracing_init();
    let store = MemoryStore::new();
    insert_items(&store, items).await;
    LibraryManager::from_store(store, TEST_VAULT_PIN)
}

/// SQLite-backed manager preloaded with (id, url) media items
///
/// Keep the TempDir alive for the duration of the test.
pub async fn sqlite_library(items: &[(&str, &str)]) -> (LibraryManager, TempDir) {
    tracing_init();
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let database = Database::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");
    insert_items(&database, items).await;
    (LibraryManager::from_store(database, TEST_VAULT_PIN), temp_dir)
}

/// (original_id, duplicate_id, url) for every stored pair, in list order
pub async fn pair_triples(manager: &LibraryManager) -> Vec<(String, String, String)> {
    manager
        .get_duplicates()
        .await
        .unwrap()
        .into_iter()
        .map(|d| (d.original_id, d.duplicate_id, d.url))
        .collect()
}

pub fn triple(original: &str, duplicate: &str, url: &str) -> (String, String, String) {
    (original.to_string(), duplicate.to_string(), url.to_string())
}
