//! Core data models for the translation memory.
//!
//! These types mirror the three durable tables (`documents`,
//! `translations`, `segments`) plus the derived shapes the store hands
//! back to callers (matches, history entries, statistics).

use anyhow::bail;
use std::fmt;
use std::str::FromStr;

/// An ordered source→target language pair.
///
/// The supported set is fixed; anything else is a configuration error
/// surfaced before any translation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LangPair {
    FrEn,
    EnFr,
    EnEs,
    EsEn,
}

impl LangPair {
    pub const ALL: [LangPair; 4] = [
        LangPair::FrEn,
        LangPair::EnFr,
        LangPair::EnEs,
        LangPair::EsEn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LangPair::FrEn => "fr-en",
            LangPair::EnFr => "en-fr",
            LangPair::EnEs => "en-es",
            LangPair::EsEn => "es-en",
        }
    }
}

impl fmt::Display for LangPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LangPair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr-en" => Ok(LangPair::FrEn),
            "en-fr" => Ok(LangPair::EnFr),
            "en-es" => Ok(LangPair::EnEs),
            "es-en" => Ok(LangPair::EsEn),
            other => bail!(
                "Unsupported language pair: '{}'. Supported: fr-en, en-fr, en-es, es-en",
                other
            ),
        }
    }
}

/// Lifecycle status of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    Pending,
    Translated,
    Revised,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Translated => "translated",
            DocumentStatus::Revised => "revised",
        }
    }

    pub fn parse(s: &str) -> Option<DocumentStatus> {
        match s {
            "pending" => Some(DocumentStatus::Pending),
            "translated" => Some(DocumentStatus::Translated),
            "revised" => Some(DocumentStatus::Revised),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unique source artifact, deduplicated by file and content hash.
///
/// Immutable after registration except for `status` and `metadata`;
/// never physically deleted.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub file_name: String,
    pub file_hash: String,
    pub content_hash: String,
    pub original_path: String,
    /// Unix timestamp of first registration.
    pub upload_date: i64,
    pub file_type: String,
    pub status: DocumentStatus,
    pub metadata: Option<serde_json::Value>,
}

/// One versioned result of translating a document into one language pair.
///
/// History is append-only: versions are never reused or renumbered, and
/// the "current" translation is implicitly the highest version for a
/// (document, lang_pair).
#[derive(Debug, Clone)]
pub struct Translation {
    pub id: i64,
    /// `None` for ad-hoc translations that have no owning document.
    pub document_id: Option<i64>,
    pub lang_pair: String,
    pub translated_content: String,
    pub translation_date: i64,
    pub is_revised: bool,
    pub revised_by: Option<String>,
    pub revision_date: Option<i64>,
    pub version: i64,
    pub revision_comments: Option<String>,
    pub quality_score: Option<i64>,
}

/// A stored (source, translated) pair scored against a query segment.
#[derive(Debug, Clone)]
pub struct SegmentMatch {
    pub source: String,
    pub translated: String,
    pub similarity: f64,
    pub confidence: Option<f64>,
}

/// One row of the reverse-chronological translation history view.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub file_name: String,
    /// Unix timestamp of the translation.
    pub date: i64,
    pub lang_pair: String,
    /// `"revised"` or `"not revised"`.
    pub status: String,
    /// Revisor identity, `"-"` when unrevised.
    pub revisor: String,
    /// Quality score, `"-"` when unset.
    pub score: String,
}

/// Aggregate counters over the whole memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub total_documents: i64,
    pub total_translations: i64,
    /// Percentage of translations marked revised.
    pub revision_rate: f64,
    /// Percentage of segment rows with `usage_count > 1`.
    pub reuse_rate: f64,
}
