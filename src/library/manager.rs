use crate::db::{
    DbDuplicate, DbMediaItem, DbVaultFile, DuplicateSummary, NewMediaItem, NewVaultFile,
};
use crate::library::{duplicates, sample_data};
use crate::store::{DuplicateStore, LibraryStore, MediaStore, StoreError, VaultStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// The library manager the HTTP layer talks to
///
/// Handles:
/// - Media and vault file listing/creation
/// - Duplicate scans, serialized behind a single lock
/// - Ignore/delete decisions on duplicate pairs
///
/// Stores are injected, so the same manager runs over the in-memory backing
/// or SQLite.
pub struct LibraryManager {
    media: Arc<dyn MediaStore>,
    duplicates: Arc<dyn DuplicateStore>,
    vault: Arc<dyn VaultStore>,
    scan_lock: Mutex<()>,
    vault_pin: String,
}

impl std::fmt::Debug for LibraryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryManager")
            .field("media", &"<dyn MediaStore>")
            .field("duplicates", &"<dyn DuplicateStore>")
            .field("vault", &"<dyn VaultStore>")
            .finish()
    }
}

impl LibraryManager {
    /// Create a library manager with separately injected stores
    pub fn new(
        media: Arc<dyn MediaStore>,
        duplicates: Arc<dyn DuplicateStore>,
        vault: Arc<dyn VaultStore>,
        vault_pin: impl Into<String>,
    ) -> Self {
        LibraryManager {
            media,
            duplicates,
            vault,
            scan_lock: Mutex::new(()),
            vault_pin: vault_pin.into(),
        }
    }

    /// Create a library manager where one backing serves every store
    pub fn from_store<S: LibraryStore + 'static>(store: S, vault_pin: impl Into<String>) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, vault_pin)
    }

    /// Get all media items in insertion order
    pub async fn get_media(&self) -> Result<Vec<DbMediaItem>, LibraryError> {
        Ok(self.media.list_media().await?)
    }

    /// Add a media item to the library
    pub async fn add_media(&self, item: NewMediaItem) -> Result<DbMediaItem, LibraryError> {
        let record = self.media.insert_media(item).await?;
        info!("Added media item {} ({})", record.id, record.url);
        Ok(record)
    }

    /// Insert the reference sample items if the library is empty
    ///
    /// Returns the number of items inserted.
    pub async fn seed_sample_data(&self) -> Result<usize, LibraryError> {
        if !self.media.list_media().await?.is_empty() {
            debug!("Library already has media, skipping sample data");
            return Ok(0);
        }

        let items = sample_data::sample_media_items();
        let count = items.len();
        for item in items {
            self.media.insert_media_with_id(item).await?;
        }
        info!("Seeded {} sample media items", count);
        Ok(count)
    }

    pub async fn get_duplicates(&self) -> Result<Vec<DbDuplicate>, LibraryError> {
        Ok(self.duplicates.list_duplicates().await?)
    }

    /// Count active and ignored duplicate pairs
    pub async fn get_duplicate_summary(&self) -> Result<DuplicateSummary, LibraryError> {
        let duplicates = self.duplicates.list_duplicates().await?;
        Ok(DuplicateSummary::from_duplicates(&duplicates))
    }

    /// Scan the media store for shared URLs and record new duplicate pairs
    ///
    /// Only one scan runs at a time. Returns the number of pairs created.
    pub async fn scan_for_duplicates(&self) -> Result<usize, LibraryError> {
        let _guard = self.scan_lock.lock().await;
        Ok(duplicates::scan(self.media.as_ref(), self.duplicates.as_ref()).await?)
    }

    /// Mark a duplicate pair as ignored. An unknown id is a no-op.
    pub async fn ignore_duplicate(&self, id: &str) -> Result<(), LibraryError> {
        if self.duplicates.set_duplicate_ignored(id).await? {
            info!("Ignored duplicate {}", id);
        } else {
            debug!("Ignore requested for unknown duplicate {}", id);
        }
        Ok(())
    }

    /// Delete a duplicate pair. An unknown id is a no-op.
    pub async fn delete_duplicate(&self, id: &str) -> Result<(), LibraryError> {
        if self.duplicates.delete_duplicate(id).await? {
            info!("Deleted duplicate {}", id);
        } else {
            debug!("Delete requested for unknown duplicate {}", id);
        }
        Ok(())
    }

    pub async fn get_vault_files(&self) -> Result<Vec<DbVaultFile>, LibraryError> {
        Ok(self.vault.list_vault_files().await?)
    }

    pub async fn add_vault_file(&self, file: NewVaultFile) -> Result<DbVaultFile, LibraryError> {
        let record = self.vault.insert_vault_file(file).await?;
        info!("Added vault file {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Delete a vault file. An unknown id is a no-op.
    pub async fn delete_vault_file(&self, id: &str) -> Result<(), LibraryError> {
        if self.vault.delete_vault_file(id).await? {
            info!("Deleted vault file {}", id);
        } else {
            debug!("Delete requested for unknown vault file {}", id);
        }
        Ok(())
    }

    /// Compare against the configured vault PIN
    ///
    /// This is a UI convenience gate, not access control: nothing on the
    /// server is locked behind it.
    pub fn check_vault_pin(&self, pin: &str) -> bool {
        pin == self.vault_pin
    }
}

/// Cheap-to-clone handle shared by the router and the binary
#[derive(Debug, Clone)]
pub struct SharedLibraryManager {
    inner: Arc<LibraryManager>,
}

impl SharedLibraryManager {
    pub fn new(library_manager: LibraryManager) -> Self {
        SharedLibraryManager {
            inner: Arc::new(library_manager),
        }
    }

    pub fn get(&self) -> &LibraryManager {
        &self.inner
    }
}

impl PartialEq for SharedLibraryManager {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> LibraryManager {
        LibraryManager::from_store(MemoryStore::new(), "1234")
    }

    #[tokio::test]
    async fn test_seed_sample_data_only_once() {
        let manager = manager();
        assert_eq!(manager.seed_sample_data().await.unwrap(), 5);
        assert_eq!(manager.seed_sample_data().await.unwrap(), 0);
        assert_eq!(manager.get_media().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_scan_over_sample_data() {
        let manager = manager();
        manager.seed_sample_data().await.unwrap();

        assert_eq!(manager.scan_for_duplicates().await.unwrap(), 2);
        let pairs: Vec<(String, String)> = manager
            .get_duplicates()
            .await
            .unwrap()
            .into_iter()
            .map(|d| (d.original_id, d.duplicate_id))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "2".to_string()),
                ("4".to_string(), "5".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_ignore_moves_pair_to_ignored_partition() {
        let manager = manager();
        manager.seed_sample_data().await.unwrap();
        manager.scan_for_duplicates().await.unwrap();

        let first = manager.get_duplicates().await.unwrap().remove(0);
        manager.ignore_duplicate(&first.id).await.unwrap();

        let summary = manager.get_duplicate_summary().await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.ignored, 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_errors() {
        let manager = manager();
        manager.ignore_duplicate("missing").await.unwrap();
        manager.delete_duplicate("missing").await.unwrap();
        manager.delete_vault_file("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_scans_create_each_pair_once() {
        let manager = SharedLibraryManager::new(manager());
        manager.get().seed_sample_data().await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get().scan_for_duplicates().await.unwrap() })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }
        assert_eq!(total, 2);
        assert_eq!(manager.get().get_duplicates().await.unwrap().len(), 2);
    }

    #[test]
    fn test_check_vault_pin() {
        let manager = manager();
        assert!(manager.check_vault_pin("1234"));
        assert!(!manager.check_vault_pin("0000"));
        assert!(!manager.check_vault_pin(""));
    }
}
