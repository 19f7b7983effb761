use crate::db::DbMediaItem;
use chrono::Utc;

/// Reference library used to populate a fresh install
///
/// Ids are fixed so the client can link to them. Two URLs are shared (items
/// 1/2 and 4/5), so a scan over this data finds two duplicates.
pub fn sample_media_items() -> Vec<DbMediaItem> {
    let entries = [
        ("1", "Video A", "https://example.com/video1.mp4", "1.2 GB", "01:30:00", "Movies"),
        ("2", "Video B", "https://example.com/video1.mp4", "1.2 GB", "01:30:00", "Movies"),
        ("3", "Video C", "https://example.com/video2.mp4", "800 MB", "00:45:00", "Series"),
        ("4", "Video D", "https://example.com/video3.mp4", "2.1 GB", "02:15:00", "Movies"),
        ("5", "Video E", "https://example.com/video3.mp4", "2.1 GB", "02:15:00", "Movies"),
    ];

    let now = Utc::now();
    entries
        .iter()
        .map(|&(id, title, url, size, duration, category)| DbMediaItem {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            thumbnail: None,
            media_type: "video".to_string(),
            size: Some(size.to_string()),
            duration: Some(duration.to_string()),
            category: Some(category.to_string()),
            created_at: now,
        })
        .collect()
}
