//! Schema creation for the three durable tables.
//!
//! The column names and types here are the wire format other tooling
//! (exports, history viewers) reads directly; changing them is a breaking
//! change. All statements are idempotent.

use anyhow::Result;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name TEXT NOT NULL,
            file_hash TEXT NOT NULL,
            content_hash TEXT NOT NULL,
            original_path TEXT NOT NULL,
            upload_date INTEGER NOT NULL,
            file_type TEXT NOT NULL,
            status TEXT NOT NULL,
            metadata TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_id INTEGER,
            lang_pair TEXT NOT NULL,
            translated_content TEXT NOT NULL,
            translation_date INTEGER NOT NULL,
            is_revised INTEGER NOT NULL DEFAULT 0,
            revised_by TEXT,
            revision_date INTEGER,
            version INTEGER NOT NULL,
            revision_comments TEXT,
            quality_score INTEGER,
            FOREIGN KEY (document_id) REFERENCES documents(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS segments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL,
            translated_text TEXT NOT NULL,
            lang_pair TEXT NOT NULL,
            usage_count INTEGER NOT NULL DEFAULT 1,
            last_used INTEGER,
            confidence_score REAL,
            hash TEXT NOT NULL,
            document_id INTEGER,
            FOREIGN KEY (document_id) REFERENCES documents(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Lookup indexes for the dedup and reuse paths
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_file_hash ON documents(file_hash)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_content_hash ON documents(content_hash)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_segment_hash ON segments(hash)")
        .execute(pool)
        .await?;

    Ok(())
}
