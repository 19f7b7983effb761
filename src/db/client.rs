use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::db::models::*;
use crate::store::{DuplicateStore, MediaStore, StoreError, VaultStore};

/// SQLite backing for all library stores
///
/// Listing queries order by rowid, which follows insertion order.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Initialize database connection and create tables
    pub async fn new(database_path: &str) -> Result<Self, sqlx::Error> {
        // Use sqlite:// with ?mode=rwc to create if it doesn't exist
        let database_url = format!("sqlite://{}?mode=rwc", database_path);
        info!("Connecting to {}", database_url);
        let pool = SqlitePool::connect(&database_url).await?;

        let db = Database { pool };
        db.create_tables().await?;
        Ok(db)
    }

    /// Create all necessary tables
    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS media_items (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                thumbnail TEXT,
                type TEXT NOT NULL DEFAULT 'video',
                size TEXT,
                duration TEXT,
                category TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_media_items_url ON media_items (url)")
            .execute(&self.pool)
            .await?;

        // One row per ordered (original, duplicate) pair, even if two scans race
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS duplicates (
                id TEXT PRIMARY KEY,
                original_id TEXT NOT NULL,
                duplicate_id TEXT NOT NULL,
                url TEXT NOT NULL,
                ignored BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL,
                UNIQUE(original_id, duplicate_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vault_files (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                type TEXT NOT NULL DEFAULT 'file',
                size TEXT,
                mime_type TEXT,
                data_url TEXT,
                source_url TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn media_from_row(row: &SqliteRow) -> Result<DbMediaItem, StoreError> {
        Ok(DbMediaItem {
            id: row.get("id"),
            title: row.get("title"),
            url: row.get("url"),
            thumbnail: row.get("thumbnail"),
            media_type: row.get("type"),
            size: row.get("size"),
            duration: row.get("duration"),
            category: row.get("category"),
            created_at: parse_timestamp(row.get("created_at"))?,
        })
    }

    fn duplicate_from_row(row: &SqliteRow) -> Result<DbDuplicate, StoreError> {
        Ok(DbDuplicate {
            id: row.get("id"),
            original_id: row.get("original_id"),
            duplicate_id: row.get("duplicate_id"),
            url: row.get("url"),
            ignored: row.get("ignored"),
            created_at: parse_timestamp(row.get("created_at"))?,
        })
    }

    fn vault_file_from_row(row: &SqliteRow) -> Result<DbVaultFile, StoreError> {
        Ok(DbVaultFile {
            id: row.get("id"),
            name: row.get("name"),
            file_type: row.get("type"),
            size: row.get("size"),
            mime_type: row.get("mime_type"),
            data_url: row.get("data_url"),
            source_url: row.get("source_url"),
            created_at: parse_timestamp(row.get("created_at"))?,
        })
    }

    /// Insert a media row; with `upsert`, an existing id is updated in place
    /// and keeps its rowid (and so its listing position)
    async fn write_media(&self, item: &DbMediaItem, upsert: bool) -> Result<(), sqlx::Error> {
        let conflict = if upsert {
            r#"
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                url = excluded.url,
                thumbnail = excluded.thumbnail,
                type = excluded.type,
                size = excluded.size,
                duration = excluded.duration,
                category = excluded.category,
                created_at = excluded.created_at
            "#
        } else {
            ""
        };
        sqlx::query(&format!(
            r#"
            INSERT INTO media_items (
                id, title, url, thumbnail, type, size, duration, category, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            {}
            "#,
            conflict
        ))
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.url)
        .bind(&item.thumbnail)
        .bind(&item.media_type)
        .bind(&item.size)
        .bind(&item.duration)
        .bind(&item.category)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {:?}: {}", value, e)))
}

#[async_trait::async_trait]
impl MediaStore for Database {
    async fn list_media(&self) -> Result<Vec<DbMediaItem>, StoreError> {
        let rows = sqlx::query("SELECT * FROM media_items ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::media_from_row).collect()
    }

    async fn insert_media(&self, item: NewMediaItem) -> Result<DbMediaItem, StoreError> {
        let record = item.into_record();
        self.write_media(&record, false).await?;
        Ok(record)
    }

    async fn insert_media_with_id(&self, item: DbMediaItem) -> Result<(), StoreError> {
        self.write_media(&item, true).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DuplicateStore for Database {
    async fn list_duplicates(&self) -> Result<Vec<DbDuplicate>, StoreError> {
        let rows = sqlx::query("SELECT * FROM duplicates ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::duplicate_from_row).collect()
    }

    async fn find_duplicate_by_pair(
        &self,
        original_id: &str,
        duplicate_id: &str,
    ) -> Result<Option<DbDuplicate>, StoreError> {
        let row =
            sqlx::query("SELECT * FROM duplicates WHERE original_id = ? AND duplicate_id = ?")
                .bind(original_id)
                .bind(duplicate_id)
                .fetch_optional(&self.pool)
                .await?;
        row.as_ref().map(Self::duplicate_from_row).transpose()
    }

    async fn insert_duplicate(&self, pair: NewDuplicate) -> Result<DbDuplicate, StoreError> {
        let record = pair.into_record();
        sqlx::query(
            r#"
            INSERT INTO duplicates (id, original_id, duplicate_id, url, ignored, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.original_id)
        .bind(&record.duplicate_id)
        .bind(&record.url)
        .bind(record.ignored)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn set_duplicate_ignored(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE duplicates SET ignored = TRUE WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_duplicate(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM duplicates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl VaultStore for Database {
    async fn list_vault_files(&self) -> Result<Vec<DbVaultFile>, StoreError> {
        let rows = sqlx::query("SELECT * FROM vault_files ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::vault_file_from_row).collect()
    }

    async fn insert_vault_file(&self, file: NewVaultFile) -> Result<DbVaultFile, StoreError> {
        let record = file.into_record();
        sqlx::query(
            r#"
            INSERT INTO vault_files (
                id, name, type, size, mime_type, data_url, source_url, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.file_type)
        .bind(&record.size)
        .bind(&record.mime_type)
        .bind(&record.data_url)
        .bind(&record.source_url)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete_vault_file(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM vault_files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
