//! Database models for the media library
//!
//! Every record carries a string id and a UTC creation timestamp. Field names
//! serialize as camelCase because the browser client reads them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_MEDIA_TYPE: &str = "video";
const DEFAULT_VAULT_FILE_TYPE: &str = "file";

/// A media item in the library
///
/// The `url` is the content locator and the only field duplicate detection
/// looks at. Everything else is descriptive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DbMediaItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
    #[serde(rename = "type")]
    pub media_type: String,
    /// Human readable size, e.g. "1.2 GB"
    pub size: Option<String>,
    /// Formatted as HH:MM:SS
    pub duration: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a media item (everything except id and created_at)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewMediaItem {
    pub fn new(title: &str, url: &str) -> Self {
        NewMediaItem {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Assign an id and timestamp, applying defaults for missing fields
    pub fn into_record(self) -> DbMediaItem {
        DbMediaItem {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            url: self.url,
            thumbnail: non_empty(self.thumbnail),
            media_type: non_empty(self.media_type)
                .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
            size: non_empty(self.size),
            duration: non_empty(self.duration),
            category: non_empty(self.category),
            created_at: Utc::now(),
        }
    }
}

/// A detected duplicate relationship between two media items
///
/// `original_id` is the first inserted item for `url`, `duplicate_id` any later
/// one. At most one pair exists per (original_id, duplicate_id).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DbDuplicate {
    pub id: String,
    pub original_id: String,
    pub duplicate_id: String,
    /// Denormalized copy of the shared URL for display
    pub url: String,
    pub ignored: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDuplicate {
    pub original_id: String,
    pub duplicate_id: String,
    pub url: String,
}

impl NewDuplicate {
    pub fn into_record(self) -> DbDuplicate {
        DbDuplicate {
            id: Uuid::new_v4().to_string(),
            original_id: self.original_id,
            duplicate_id: self.duplicate_id,
            url: self.url,
            ignored: false,
            created_at: Utc::now(),
        }
    }
}

/// Active/ignored partition of the stored duplicate pairs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DuplicateSummary {
    pub total: usize,
    pub active: usize,
    pub ignored: usize,
}

impl DuplicateSummary {
    pub fn from_duplicates(duplicates: &[DbDuplicate]) -> Self {
        let ignored = duplicates.iter().filter(|d| d.ignored).count();
        DuplicateSummary {
            total: duplicates.len(),
            active: duplicates.len() - ignored,
            ignored,
        }
    }
}

/// A file entry kept in the vault
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DbVaultFile {
    pub id: String,
    pub name: String,
    /// "file" or "folder"
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: Option<String>,
    pub mime_type: Option<String>,
    /// Inline content as a data: URL
    pub data_url: Option<String>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewVaultFile {
    pub name: String,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data_url: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl NewVaultFile {
    pub fn into_record(self) -> DbVaultFile {
        DbVaultFile {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            file_type: non_empty(self.file_type)
                .unwrap_or_else(|| DEFAULT_VAULT_FILE_TYPE.to_string()),
            size: non_empty(self.size),
            mime_type: non_empty(self.mime_type),
            data_url: non_empty(self.data_url),
            source_url: non_empty(self.source_url),
            created_at: Utc::now(),
        }
    }
}

// Empty strings from form fields are stored as null
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_media_item_defaults_type_to_video() {
        let item = NewMediaItem::new("Clip", "https://example.com/clip.mp4").into_record();
        assert_eq!(item.media_type, "video");
        assert_eq!(item.thumbnail, None);
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_empty_optional_fields_become_none() {
        let item = NewMediaItem {
            size: Some(String::new()),
            media_type: Some(String::new()),
            category: Some("Movies".to_string()),
            ..NewMediaItem::new("Clip", "u")
        }
        .into_record();
        assert_eq!(item.size, None);
        assert_eq!(item.media_type, "video");
        assert_eq!(item.category.as_deref(), Some("Movies"));
    }

    #[test]
    fn test_media_item_serializes_camel_case_with_type() {
        let item = NewMediaItem::new("Clip", "u").into_record();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "video");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("media_type").is_none());
    }

    #[test]
    fn test_new_media_item_accepts_client_payload() {
        let payload = r#"{"title":"A","url":"u","type":"audio","category":null}"#;
        let item: NewMediaItem = serde_json::from_str(payload).unwrap();
        assert_eq!(item.media_type.as_deref(), Some("audio"));
        assert_eq!(item.category, None);
    }

    #[test]
    fn test_duplicate_serializes_ids_camel_case() {
        let dup = NewDuplicate {
            original_id: "1".to_string(),
            duplicate_id: "2".to_string(),
            url: "a".to_string(),
        }
        .into_record();
        let json = serde_json::to_value(&dup).unwrap();
        assert_eq!(json["originalId"], "1");
        assert_eq!(json["duplicateId"], "2");
        assert_eq!(json["ignored"], false);
    }

    #[test]
    fn test_summary_partitions_by_ignored() {
        let mut pairs: Vec<DbDuplicate> = (0..3)
            .map(|i| {
                NewDuplicate {
                    original_id: "1".to_string(),
                    duplicate_id: format!("{}", i + 2),
                    url: "a".to_string(),
                }
                .into_record()
            })
            .collect();
        pairs[0].ignored = true;

        let summary = DuplicateSummary::from_duplicates(&pairs);
        assert_eq!(
            summary,
            DuplicateSummary {
                total: 3,
                active: 2,
                ignored: 1
            }
        );
    }

    #[test]
    fn test_vault_file_defaults_type_to_file() {
        let file = NewVaultFile {
            name: "notes.txt".to_string(),
            ..Default::default()
        }
        .into_record();
        assert_eq!(file.file_type, "file");
    }
}
