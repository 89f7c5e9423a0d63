//! Durable translation memory store.
//!
//! [`TranslationStore`] owns the SQLite pool and exposes every operation
//! the reuse engine and CLI need: content-addressed document registration,
//! similarity scans over recent documents and segments, transactional
//! versioned translation writes, the history view, and aggregate
//! statistics.
//!
//! Failure semantics follow a simple rule: mutating operations roll back
//! and re-raise; read-only aggregates degrade to empty/default results so
//! callers can treat "error" as "no matches found".

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::{debug, error, info, warn};

use crate::config::{Config, ReuseConfig};
use crate::hash;
use crate::matcher;
use crate::migrate;
use crate::models::{
    Document, DocumentStatus, HistoryEntry, LangPair, SegmentMatch, Statistics, Translation,
};

pub struct TranslationStore {
    pool: SqlitePool,
    reuse: ReuseConfig,
}

impl TranslationStore {
    /// Open (creating if missing) the database at the configured path and
    /// ensure the schema exists.
    pub async fn open(config: &Config) -> Result<Self> {
        let db_path = &config.db.path;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        migrate::run_migrations(&pool).await?;
        info!(path = %db_path.display(), "translation memory opened");

        Ok(Self {
            pool,
            reuse: config.reuse.clone(),
        })
    }

    /// Register a document, deduplicating by file hash or content hash.
    ///
    /// Returns `(id, true)` when a document with either hash already
    /// exists; otherwise inserts a `pending` row and returns
    /// `(new_id, false)`.
    pub async fn register_document(
        &self,
        path: &Path,
        content: &str,
        file_type: &str,
        metadata: Option<&serde_json::Value>,
    ) -> Result<(i64, bool)> {
        let file_hash = hash::file_hash(path)?;
        let content_hash = hash::content_hash(content);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM documents WHERE content_hash = ? OR file_hash = ?")
                .bind(&content_hash)
                .bind(&file_hash)
                .fetch_optional(&self.pool)
                .await
                .context("Document dedup lookup failed")?;

        if let Some(id) = existing {
            info!(id, %file_name, "document already registered");
            return Ok((id, true));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO documents (
                file_name, file_hash, content_hash, original_path,
                upload_date, file_type, status, metadata
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&file_name)
        .bind(&file_hash)
        .bind(&content_hash)
        .bind(path.display().to_string())
        .bind(Utc::now().timestamp())
        .bind(file_type)
        .bind(DocumentStatus::Pending.as_str())
        .bind(metadata.map(|m| m.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(%file_name, error = %e, "document insert failed");
            e
        })
        .context("Failed to store document")?;

        let id = result.last_insert_rowid();
        info!(id, %file_name, "document registered");
        Ok((id, false))
    }

    /// Rank recently uploaded documents by similarity to `content`.
    ///
    /// Each candidate is re-read from its stored `original_path`; paths
    /// that are no longer readable are skipped, not errors. Any database
    /// failure degrades to an empty result.
    pub async fn find_similar_documents(&self, content: &str, threshold: f64) -> Vec<(i64, f64)> {
        match self.try_find_similar_documents(content, threshold).await {
            Ok(similar) => similar,
            Err(e) => {
                error!(error = %e, "similar-document scan failed");
                Vec::new()
            }
        }
    }

    async fn try_find_similar_documents(
        &self,
        content: &str,
        threshold: f64,
    ) -> Result<Vec<(i64, f64)>> {
        let rows = sqlx::query(
            r#"
            SELECT id, original_path
            FROM documents
            ORDER BY upload_date DESC
            LIMIT ?
            "#,
        )
        .bind(self.reuse.recent_documents)
        .fetch_all(&self.pool)
        .await?;

        let mut similar = Vec::new();
        for row in &rows {
            let id: i64 = row.get("id");
            let original_path: String = row.get("original_path");
            let doc_content = match std::fs::read_to_string(&original_path) {
                Ok(text) => text,
                Err(e) => {
                    debug!(id, %original_path, error = %e, "skipping unreadable document");
                    continue;
                }
            };
            let score = matcher::similarity(content, &doc_content);
            if score >= threshold {
                similar.push((id, score));
            }
        }

        // Stable sort: equal scores keep recency order.
        similar.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(similar)
    }

    /// Rank the most recently used segments for a language pair by
    /// similarity to `segment`. Pure read: usage counters are only touched
    /// by [`store_translation`](Self::store_translation). Database
    /// failures degrade to an empty result.
    pub async fn find_matching_segments(
        &self,
        segment: &str,
        lang_pair: LangPair,
        threshold: f64,
    ) -> Vec<SegmentMatch> {
        match self
            .try_find_matching_segments(segment, lang_pair, threshold)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                error!(error = %e, "segment match query failed");
                Vec::new()
            }
        }
    }

    async fn try_find_matching_segments(
        &self,
        segment: &str,
        lang_pair: LangPair,
        threshold: f64,
    ) -> Result<Vec<SegmentMatch>> {
        let rows = sqlx::query(
            r#"
            SELECT source_text, translated_text, confidence_score
            FROM segments
            WHERE lang_pair = ?
            ORDER BY last_used DESC
            LIMIT ?
            "#,
        )
        .bind(lang_pair.as_str())
        .bind(self.reuse.recent_segments)
        .fetch_all(&self.pool)
        .await?;

        let sources: Vec<String> = rows.iter().map(|r| r.get("source_text")).collect();
        let candidates: Vec<&str> = sources.iter().map(String::as_str).collect();

        let matches = matcher::find_matches(segment, &candidates, threshold)
            .into_iter()
            .map(|(idx, score)| SegmentMatch {
                source: sources[idx].clone(),
                translated: rows[idx].get("translated_text"),
                similarity: score,
                confidence: rows[idx].get("confidence_score"),
            })
            .collect();

        Ok(matches)
    }

    /// Store a translation (and its segment pairs) in one transaction.
    ///
    /// The version is computed and inserted in a single statement, so two
    /// concurrent writers for the same document cannot observe the same
    /// max. Each segment row's `usage_count` is `1 + MAX(usage_count)`
    /// over rows with the same source hash; rows are never updated in
    /// place, so repeated storage of one source string yields a row series
    /// with ascending counters.
    pub async fn store_translation(
        &self,
        document_id: Option<i64>,
        lang_pair: LangPair,
        translated_content: &str,
        segment_pairs: &[(String, String)],
    ) -> Result<i64> {
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO translations (
                document_id, lang_pair, translated_content,
                translation_date, version
            )
            VALUES (?, ?, ?, ?,
                    (SELECT COALESCE(MAX(version), 0) + 1
                     FROM translations
                     WHERE document_id = ?))
            "#,
        )
        .bind(document_id)
        .bind(lang_pair.as_str())
        .bind(translated_content)
        .bind(now)
        .bind(document_id)
        .execute(&mut *tx)
        .await
        .context("Failed to store translation")?;

        let translation_id = result.last_insert_rowid();

        for (source, translated) in segment_pairs {
            let segment_hash = hash::segment_hash(source);
            sqlx::query(
                r#"
                INSERT INTO segments (
                    source_text, translated_text, lang_pair, hash,
                    usage_count, last_used, confidence_score, document_id
                )
                VALUES (?, ?, ?, ?,
                        (SELECT COALESCE(MAX(usage_count), 0) + 1
                         FROM segments WHERE hash = ?),
                        ?, 1.0, ?)
                "#,
            )
            .bind(source)
            .bind(translated)
            .bind(lang_pair.as_str())
            .bind(&segment_hash)
            .bind(&segment_hash)
            .bind(now)
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .context("Failed to store segment")?;
        }

        tx.commit().await.context("Failed to commit translation")?;
        info!(
            translation_id,
            document_id = ?document_id,
            lang_pair = %lang_pair,
            segments = segment_pairs.len(),
            "translation stored"
        );
        Ok(translation_id)
    }

    /// Fetch a document row by id.
    pub async fn get_document_info(&self, id: i64) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT id, file_name, file_hash, content_hash, original_path,
                   upload_date, file_type, status, metadata
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Document lookup failed")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_raw: String = row.get("status");
        let status = DocumentStatus::parse(&status_raw).unwrap_or_else(|| {
            warn!(id, status = %status_raw, "unknown document status");
            DocumentStatus::Pending
        });

        let metadata = row
            .get::<Option<String>, _>("metadata")
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(id, error = %e, "unparseable document metadata");
                    None
                }
            });

        Ok(Some(Document {
            id: row.get("id"),
            file_name: row.get("file_name"),
            file_hash: row.get("file_hash"),
            content_hash: row.get("content_hash"),
            original_path: row.get("original_path"),
            upload_date: row.get("upload_date"),
            file_type: row.get("file_type"),
            status,
            metadata,
        }))
    }

    /// The most recent translation version for a (document, pair), if any.
    pub async fn latest_translation(
        &self,
        document_id: i64,
        lang_pair: LangPair,
    ) -> Result<Option<Translation>> {
        let row = sqlx::query(
            r#"
            SELECT id, document_id, lang_pair, translated_content,
                   translation_date, is_revised, revised_by, revision_date,
                   version, revision_comments, quality_score
            FROM translations
            WHERE document_id = ? AND lang_pair = ?
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(document_id)
        .bind(lang_pair.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Translation lookup failed")?;

        Ok(row.map(|row| Translation {
            id: row.get("id"),
            document_id: row.get("document_id"),
            lang_pair: row.get("lang_pair"),
            translated_content: row.get("translated_content"),
            translation_date: row.get("translation_date"),
            is_revised: row.get::<i64, _>("is_revised") != 0,
            revised_by: row.get("revised_by"),
            revision_date: row.get("revision_date"),
            version: row.get("version"),
            revision_comments: row.get("revision_comments"),
            quality_score: row.get("quality_score"),
        }))
    }

    /// Flip a document's lifecycle status (e.g. `pending` → `translated`).
    pub async fn set_document_status(&self, id: i64, status: DocumentStatus) -> Result<()> {
        sqlx::query("UPDATE documents SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update document status")?;
        Ok(())
    }

    /// Record a reviewer's verdict on a translation, in place.
    ///
    /// The core never calls this during translation; it is the write path
    /// for the external reviewer role.
    pub async fn mark_revised(
        &self,
        translation_id: i64,
        revised_by: &str,
        comments: Option<&str>,
        quality_score: Option<i64>,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE translations
            SET is_revised = 1,
                revised_by = ?,
                revision_date = ?,
                revision_comments = COALESCE(?, revision_comments),
                quality_score = COALESCE(?, quality_score)
            WHERE id = ?
            "#,
        )
        .bind(revised_by)
        .bind(Utc::now().timestamp())
        .bind(comments)
        .bind(quality_score)
        .bind(translation_id)
        .execute(&self.pool)
        .await
        .context("Failed to mark translation revised")?;

        if result.rows_affected() == 0 {
            anyhow::bail!("Translation not found: {}", translation_id);
        }
        Ok(())
    }

    /// Reverse-chronological history of document translations.
    ///
    /// Ad-hoc translations have no document and do not appear. Database
    /// failures degrade to an empty list.
    pub async fn get_translation_history(&self) -> Vec<HistoryEntry> {
        match self.try_get_translation_history().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "history query failed");
                Vec::new()
            }
        }
    }

    async fn try_get_translation_history(&self) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT
                d.file_name,
                t.translation_date,
                t.lang_pair,
                t.is_revised,
                t.revised_by,
                t.quality_score
            FROM translations t
            JOIN documents d ON t.document_id = d.id
            ORDER BY t.translation_date DESC, t.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let is_revised = row.get::<i64, _>("is_revised") != 0;
                HistoryEntry {
                    file_name: row.get("file_name"),
                    date: row.get("translation_date"),
                    lang_pair: row.get("lang_pair"),
                    status: if is_revised { "revised" } else { "not revised" }.to_string(),
                    revisor: row
                        .get::<Option<String>, _>("revised_by")
                        .unwrap_or_else(|| "-".to_string()),
                    score: row
                        .get::<Option<i64>, _>("quality_score")
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                }
            })
            .collect())
    }

    /// Aggregate counters over the whole memory. Database failures degrade
    /// to all-zero statistics.
    pub async fn get_statistics(&self) -> Statistics {
        match self.try_get_statistics().await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "statistics query failed");
                Statistics::default()
            }
        }
    }

    async fn try_get_statistics(&self) -> Result<Statistics> {
        let total_documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let total_translations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translations")
            .fetch_one(&self.pool)
            .await?;

        let revised_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM translations WHERE is_revised = 1")
                .fetch_one(&self.pool)
                .await?;

        let reused_segments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM segments WHERE usage_count > 1")
                .fetch_one(&self.pool)
                .await?;

        let total_segments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM segments")
            .fetch_one(&self.pool)
            .await?;

        let revision_rate = if total_translations > 0 {
            revised_count as f64 / total_translations as f64 * 100.0
        } else {
            0.0
        };
        let reuse_rate = if total_segments > 0 {
            reused_segments as f64 / total_segments as f64 * 100.0
        } else {
            0.0
        };

        Ok(Statistics {
            total_documents,
            total_translations,
            revision_rate,
            reuse_rate,
        })
    }

    /// Size of the database file on disk, zero if unknown.
    pub fn db_size(&self, config: &Config) -> u64 {
        std::fs::metadata(&config.db.path)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    /// Release the connection pool. Idempotent; never fails.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("translation memory closed");
    }
}
