//! Reuse-vs-translate orchestration.
//!
//! [`ReuseEngine`] sits between callers and the translation backend. For
//! every segment it decides, in order: pass the text through unchanged
//! (nothing to translate), reuse a sufficiently similar stored
//! translation verbatim, or call the backend and persist the fresh
//! result. Documents are registered, segmented, translated segment by
//! segment in source order, and persisted as one new translation version.
//!
//! The two entry points deliberately fail differently:
//! - [`translate_text`](ReuseEngine::translate_text) (ad-hoc) never fails
//!   on backend errors; it returns [`SegmentOutcome::Unchanged`] with the
//!   reason instead;
//! - [`translate_document`](ReuseEngine::translate_document) (batch)
//!   propagates backend errors and persists nothing for the failed call
//!   (the document registration itself stays).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ReuseConfig;
use crate::matcher;
use crate::models::{DocumentStatus, LangPair};
use crate::progress::ProgressReporter;
use crate::segment;
use crate::store::TranslationStore;
use crate::translator::{clean_translation, Translator};

/// Outcome of an ad-hoc segment translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// A translation was produced (reused or fresh).
    Translated(String),
    /// The input was returned as-is.
    Unchanged { text: String, reason: UnchangedReason },
}

impl SegmentOutcome {
    /// The text a caller should display, whichever way it was produced.
    pub fn into_text(self) -> String {
        match self {
            SegmentOutcome::Translated(text) => text,
            SegmentOutcome::Unchanged { text, .. } => text,
        }
    }
}

/// Why an ad-hoc translation left its input unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Empty or without any alphanumeric character.
    NotTranslatable,
    /// The backend failed; the source text is the graceful fallback.
    TranslatorFailed,
}

/// The policy layer driving reuse decisions and the translation backend.
///
/// Owns its collaborators explicitly (the store, the injected backend
/// capability, and the tunable policy), so there is no ambient state.
/// [`close`](ReuseEngine::close) is the explicit end of life.
pub struct ReuseEngine {
    store: TranslationStore,
    translator: Box<dyn Translator>,
    reuse: ReuseConfig,
}

impl ReuseEngine {
    pub fn new(store: TranslationStore, translator: Box<dyn Translator>, reuse: ReuseConfig) -> Self {
        Self {
            store,
            translator,
            reuse,
        }
    }

    /// Access to the underlying store for read-side consumers
    /// (history, statistics, similarity scans).
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Translate a single ad-hoc segment.
    ///
    /// Backend failures are swallowed here: the caller gets the source
    /// text back, tagged [`UnchangedReason::TranslatorFailed`].
    /// Persistence failures after a successful backend call still
    /// propagate: a translation that cannot be recorded must not look
    /// like a success.
    pub async fn translate_text(&self, text: &str, pair: LangPair) -> Result<SegmentOutcome> {
        if !is_translatable(text) {
            return Ok(SegmentOutcome::Unchanged {
                text: text.to_string(),
                reason: UnchangedReason::NotTranslatable,
            });
        }

        if let Some(reused) = self.lookup_reuse(text, pair, &[]).await {
            info!(pair = %pair, "reusing stored segment translation");
            return Ok(SegmentOutcome::Translated(reused));
        }

        match self.translator.translate(text, pair).await {
            Ok(raw) => {
                let cleaned = clean_translation(&raw);
                self.store
                    .store_translation(
                        None,
                        pair,
                        &cleaned,
                        &[(text.to_string(), cleaned.clone())],
                    )
                    .await?;
                Ok(SegmentOutcome::Translated(cleaned))
            }
            Err(e) => {
                warn!(pair = %pair, error = %e, "translation failed, returning source text");
                Ok(SegmentOutcome::Unchanged {
                    text: text.to_string(),
                    reason: UnchangedReason::TranslatorFailed,
                })
            }
        }
    }

    /// Translate a whole document, reusing stored segments where possible.
    ///
    /// The document is registered first (dedup by hash); a previously
    /// registered document with a translation younger than the freshness
    /// window short-circuits to that text. Otherwise segments are
    /// translated in source order (pairs produced earlier in the run are
    /// match candidates for later segments), progress is reported after
    /// each, and the assembled result plus all segment pairs are persisted
    /// in one transaction at the end. A backend failure aborts the call
    /// with nothing persisted beyond the registration.
    pub async fn translate_document(
        &self,
        path: &Path,
        content: &str,
        pair: LangPair,
        progress: &dyn ProgressReporter,
    ) -> Result<String> {
        let file_type = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (doc_id, existed) = self
            .store
            .register_document(path, content, &file_type, None)
            .await?;

        if existed {
            if let Some(previous) = self.store.latest_translation(doc_id, pair).await? {
                let age = Utc::now().timestamp() - previous.translation_date;
                if age < self.reuse.freshness_hours * 3600 {
                    info!(
                        doc_id,
                        version = previous.version,
                        "returning fresh existing translation"
                    );
                    return Ok(previous.translated_content);
                }
            }
        }

        let segments = segment::split(content);
        let total = segments.len();
        debug!(doc_id, segments = total, "document segmented");

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(total);
        for (i, seg) in segments.iter().enumerate() {
            let translated = self
                .translate_segment(seg, pair, &pairs)
                .await
                .with_context(|| format!("Failed to translate segment {} of {}", i + 1, total))?;
            pairs.push((seg.clone(), translated));
            progress.on_progress(((i + 1) * 100 / total) as u32);
        }

        let translated_content = pairs
            .iter()
            .map(|(_, translated)| translated.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        self.store
            .store_translation(Some(doc_id), pair, &translated_content, &pairs)
            .await?;
        self.store
            .set_document_status(doc_id, DocumentStatus::Translated)
            .await?;

        info!(doc_id, pair = %pair, segments = total, "document translated");
        Ok(translated_content)
    }

    /// One segment of a document run. Unlike the ad-hoc path, a backend
    /// failure propagates and aborts the document.
    async fn translate_segment(
        &self,
        text: &str,
        pair: LangPair,
        run_pairs: &[(String, String)],
    ) -> Result<String> {
        if !is_translatable(text) {
            return Ok(text.to_string());
        }

        if let Some(reused) = self.lookup_reuse(text, pair, run_pairs).await {
            return Ok(reused);
        }

        let raw = self
            .translator
            .translate(text, pair)
            .await
            .map_err(anyhow::Error::from)?;
        Ok(clean_translation(&raw))
    }

    /// Find a stored (or in-run) translation similar enough to reuse
    /// verbatim. Returns `None` below the cutoff; the boundary is
    /// inclusive. Pairs from the current document run are checked first,
    /// being the most recently used candidates of all.
    async fn lookup_reuse(
        &self,
        text: &str,
        pair: LangPair,
        run_pairs: &[(String, String)],
    ) -> Option<String> {
        if text.chars().count() <= self.reuse.min_lookup_chars {
            return None;
        }

        let run_sources: Vec<&str> = run_pairs.iter().rev().map(|(s, _)| s.as_str()).collect();
        let run_best = matcher::find_matches(text, &run_sources, self.reuse.segment_threshold)
            .into_iter()
            .next()
            .map(|(idx, score)| {
                let (_, translated) = &run_pairs[run_pairs.len() - 1 - idx];
                (translated.clone(), score)
            });

        let store_best = self
            .store
            .find_matching_segments(text, pair, self.reuse.segment_threshold)
            .await
            .into_iter()
            .next()
            .map(|m| (m.translated, m.similarity));

        let best = match (run_best, store_best) {
            (Some(run), Some(store)) => {
                if run.1 >= store.1 {
                    Some(run)
                } else {
                    Some(store)
                }
            }
            (run, store) => run.or(store),
        };

        match best {
            Some((translated, score)) if score >= self.reuse.reuse_cutoff => Some(translated),
            _ => None,
        }
    }

    /// Explicit end of life: release the store. Idempotent; never fails.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// A segment is worth translating only if it has at least one
/// alphanumeric character.
fn is_translatable(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_translatable() {
        assert!(is_translatable("Hello"));
        assert!(is_translatable("a"));
        assert!(is_translatable("héllo"));
        assert!(!is_translatable(""));
        assert!(!is_translatable("   "));
        assert!(!is_translatable("!!!"));
        assert!(!is_translatable("... --- ..."));
    }

    #[test]
    fn test_outcome_into_text() {
        assert_eq!(
            SegmentOutcome::Translated("Bonjour".into()).into_text(),
            "Bonjour"
        );
        assert_eq!(
            SegmentOutcome::Unchanged {
                text: "!!!".into(),
                reason: UnchangedReason::NotTranslatable,
            }
            .into_text(),
            "!!!"
        );
    }
}
