use crate::db::{DbMediaItem, NewDuplicate};
use crate::store::{DuplicateStore, MediaStore, StoreError};
use std::collections::HashMap;
use tracing::{debug, info};

/// Media items sharing one URL, in the order the media store listed them
#[derive(Debug, Clone, PartialEq)]
pub struct UrlGroup {
    url: String,
    items: Vec<DbMediaItem>,
}

impl UrlGroup {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn items(&self) -> &[DbMediaItem] {
        &self.items
    }

    /// The canonical item for this URL (first inserted)
    pub fn original(&self) -> &DbMediaItem {
        &self.items[0]
    }

    /// Every item after the original
    pub fn duplicates(&self) -> &[DbMediaItem] {
        &self.items[1..]
    }

    pub fn has_duplicates(&self) -> bool {
        self.items.len() > 1
    }
}

/// Group media items by exact URL
///
/// Groups come out in first-seen order, and items within a group keep their
/// input order. Every group is non-empty.
pub fn group_by_url(items: Vec<DbMediaItem>) -> Vec<UrlGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<UrlGroup> = Vec::new();

    for item in items {
        match index.get(&item.url) {
            Some(&position) => groups[position].items.push(item),
            None => {
                index.insert(item.url.clone(), groups.len());
                groups.push(UrlGroup {
                    url: item.url.clone(),
                    items: vec![item],
                });
            }
        }
    }

    groups
}

/// Record a duplicate pair for every media item whose URL was already taken
/// by an earlier item
///
/// Existing pairs are left untouched, so re-running on unchanged media creates
/// nothing. Returns the number of pairs created by this call. A storage error
/// aborts the scan; pairs created before it stay.
pub async fn scan(
    media: &dyn MediaStore,
    duplicates: &dyn DuplicateStore,
) -> Result<usize, StoreError> {
    let items = media.list_media().await?;
    let item_count = items.len();
    let groups = group_by_url(items);

    let mut created = 0;
    for group in groups.iter().filter(|g| g.has_duplicates()) {
        let original = group.original();
        for dup in group.duplicates() {
            if duplicates
                .find_duplicate_by_pair(&original.id, &dup.id)
                .await?
                .is_some()
            {
                continue;
            }

            let pair = duplicates
                .insert_duplicate(NewDuplicate {
                    original_id: original.id.clone(),
                    duplicate_id: dup.id.clone(),
                    url: group.url.clone(),
                })
                .await?;
            debug!(
                "Recorded duplicate {} of {} for {}",
                pair.duplicate_id, pair.original_id, pair.url
            );
            created += 1;
        }
    }

    info!(
        "Duplicate scan over {} media items in {} URL groups created {} pairs",
        item_count,
        groups.len(),
        created
    );
    Ok(created)
}
