mod memory;

pub use memory::MemoryStore;

use crate::db::{
    DbDuplicate, DbMediaItem, DbVaultFile, NewDuplicate, NewMediaItem, NewVaultFile,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Media records, listed in insertion order
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    async fn list_media(&self) -> Result<Vec<DbMediaItem>, StoreError>;
    async fn insert_media(&self, item: NewMediaItem) -> Result<DbMediaItem, StoreError>;
    /// Store a record whose id and timestamp are already assigned
    async fn insert_media_with_id(&self, item: DbMediaItem) -> Result<(), StoreError>;
}

/// Duplicate pairs, listed in insertion order
///
/// `set_duplicate_ignored` and `delete_duplicate` return whether a record was
/// touched; an absent id is not an error here.
#[async_trait::async_trait]
pub trait DuplicateStore: Send + Sync {
    async fn list_duplicates(&self) -> Result<Vec<DbDuplicate>, StoreError>;
    async fn find_duplicate_by_pair(
        &self,
        original_id: &str,
        duplicate_id: &str,
    ) -> Result<Option<DbDuplicate>, StoreError>;
    async fn insert_duplicate(&self, pair: NewDuplicate) -> Result<DbDuplicate, StoreError>;
    async fn set_duplicate_ignored(&self, id: &str) -> Result<bool, StoreError>;
    async fn delete_duplicate(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
pub trait VaultStore: Send + Sync {
    async fn list_vault_files(&self) -> Result<Vec<DbVaultFile>, StoreError>;
    async fn insert_vault_file(&self, file: NewVaultFile) -> Result<DbVaultFile, StoreError>;
    async fn delete_vault_file(&self, id: &str) -> Result<bool, StoreError>;
}

/// A backing that provides every store the library needs
pub trait LibraryStore: MediaStore + DuplicateStore + VaultStore {}

impl<T: MediaStore + DuplicateStore + VaultStore> LibraryStore for T {}
