use super::{DuplicateStore, MediaStore, StoreError, VaultStore};
use crate::db::{
    DbDuplicate, DbMediaItem, DbVaultFile, NewDuplicate, NewMediaItem, NewVaultFile,
};
use std::sync::{Mutex, MutexGuard};

/// In-memory backing for all library stores
///
/// Records live in vectors so listing order is insertion order. Nothing
/// survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    media: Mutex<Vec<DbMediaItem>>,
    duplicates: Mutex<Vec<DbDuplicate>>,
    vault_files: Mutex<Vec<DbVaultFile>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex.lock().map_err(|_| StoreError::Poisoned(name.to_string()))
}

#[async_trait::async_trait]
impl MediaStore for MemoryStore {
    async fn list_media(&self) -> Result<Vec<DbMediaItem>, StoreError> {
        Ok(lock(&self.media, "media")?.clone())
    }

    async fn insert_media(&self, item: NewMediaItem) -> Result<DbMediaItem, StoreError> {
        let record = item.into_record();
        lock(&self.media, "media")?.push(record.clone());
        Ok(record)
    }

    async fn insert_media_with_id(&self, item: DbMediaItem) -> Result<(), StoreError> {
        let mut media = lock(&self.media, "media")?;
        // Same id replaces in place, keeping its original position
        match media.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => *existing = item,
            None => media.push(item),
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DuplicateStore for MemoryStore {
    async fn list_duplicates(&self) -> Result<Vec<DbDuplicate>, StoreError> {
        Ok(lock(&self.duplicates, "duplicates")?.clone())
    }

    async fn find_duplicate_by_pair(
        &self,
        original_id: &str,
        duplicate_id: &str,
    ) -> Result<Option<DbDuplicate>, StoreError> {
        Ok(lock(&self.duplicates, "duplicates")?
            .iter()
            .find(|d| d.original_id == original_id && d.duplicate_id == duplicate_id)
            .cloned())
    }

    async fn insert_duplicate(&self, pair: NewDuplicate) -> Result<DbDuplicate, StoreError> {
        let record = pair.into_record();
        lock(&self.duplicates, "duplicates")?.push(record.clone());
        Ok(record)
    }

    async fn set_duplicate_ignored(&self, id: &str) -> Result<bool, StoreError> {
        let mut duplicates = lock(&self.duplicates, "duplicates")?;
        match duplicates.iter_mut().find(|d| d.id == id) {
            Some(duplicate) => {
                duplicate.ignored = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_duplicate(&self, id: &str) -> Result<bool, StoreError> {
        let mut duplicates = lock(&self.duplicates, "duplicates")?;
        let before = duplicates.len();
        duplicates.retain(|d| d.id != id);
        Ok(duplicates.len() < before)
    }
}

#[async_trait::async_trait]
impl VaultStore for MemoryStore {
    async fn list_vault_files(&self) -> Result<Vec<DbVaultFile>, StoreError> {
        Ok(lock(&self.vault_files, "vault_files")?.clone())
    }

    async fn insert_vault_file(&self, file: NewVaultFile) -> Result<DbVaultFile, StoreError> {
        let record = file.into_record();
        lock(&self.vault_files, "vault_files")?.push(record.clone());
        Ok(record)
    }

    async fn delete_vault_file(&self, id: &str) -> Result<bool, StoreError> {
        let mut files = lock(&self.vault_files, "vault_files")?;
        let before = files.len();
        files.retain(|f| f.id != id);
        Ok(files.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_media_listed_in_insertion_order() {
        let store = MemoryStore::new();
        for title in ["first", "second", "third"] {
            store
                .insert_media(NewMediaItem::new(title, "https://example.com/a.mp4"))
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_media()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_find_duplicate_by_pair_is_ordered() {
        let store = MemoryStore::new();
        store
            .insert_duplicate(NewDuplicate {
                original_id: "1".to_string(),
                duplicate_id: "2".to_string(),
                url: "a".to_string(),
            })
            .await
            .unwrap();

        assert!(store.find_duplicate_by_pair("1", "2").await.unwrap().is_some());
        assert!(store.find_duplicate_by_pair("2", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ignore_and_delete_report_absent_ids() {
        let store = MemoryStore::new();
        let pair = store
            .insert_duplicate(NewDuplicate {
                original_id: "1".to_string(),
                duplicate_id: "2".to_string(),
                url: "a".to_string(),
            })
            .await
            .unwrap();

        assert!(store.set_duplicate_ignored(&pair.id).await.unwrap());
        assert!(!store.set_duplicate_ignored("missing").await.unwrap());
        assert!(store.list_duplicates().await.unwrap()[0].ignored);

        assert!(store.delete_duplicate(&pair.id).await.unwrap());
        assert!(!store.delete_duplicate(&pair.id).await.unwrap());
        assert!(store.list_duplicates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_media_with_id_replaces_existing() {
        let store = MemoryStore::new();
        let mut item = NewMediaItem::new("old", "u").into_record();
        item.id = "1".to_string();
        store.insert_media_with_id(item.clone()).await.unwrap();
        item.title = "new".to_string();
        store.insert_media_with_id(item).await.unwrap();

        let media = store.list_media().await.unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].title, "new");
    }
}
