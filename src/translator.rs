//! Translation backend abstraction and implementations.
//!
//! Defines the [`Translator`] trait and concrete implementations:
//! - **[`DisabledTranslator`]** — returns errors; used when no backend is
//!   configured.
//! - **[`HttpTranslator`]** — calls an HTTP translation service with
//!   per-pair model names, retry, and backoff.
//!
//! Also provides [`clean_translation`], the post-processing applied to
//! every fresh backend result before it is returned or persisted.
//!
//! # Retry Strategy
//!
//! The HTTP translator uses exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::config::TranslatorConfig;
use crate::models::LangPair;

/// Why a translation request failed.
///
/// The reuse engine's two entry points treat this differently: the ad-hoc
/// path degrades to returning the source text, the document path aborts.
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("Translation backend is disabled")]
    Disabled,
    #[error("Translation request failed: {0}")]
    Http(String),
    #[error("Invalid response from translation backend: {0}")]
    InvalidResponse(String),
}

/// A translation backend for the fixed set of supported language pairs.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Backend identifier for logs and the CLI.
    fn name(&self) -> &str;

    /// Translate `text` for the given pair. May be slow; may fail.
    async fn translate(&self, text: &str, pair: LangPair) -> Result<String, TranslatorError>;
}

// ============ Disabled Translator ============

/// A no-op backend that always returns errors.
///
/// Used when `translator.provider = "disabled"` in the configuration.
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn translate(&self, _text: &str, _pair: LangPair) -> Result<String, TranslatorError> {
        Err(TranslatorError::Disabled)
    }
}

// ============ HTTP Translator ============

/// Backend that POSTs to an HTTP translation service.
///
/// The request body is `{"model": ..., "text": ..., "lang_pair": ...}` and
/// the expected response is `{"translation": "..."}`. Model names are
/// resolved per language pair from `[translator.models]`, falling back to
/// `opus-mt-<pair>`.
pub struct HttpTranslator {
    endpoint: String,
    client: reqwest::Client,
    models: HashMap<LangPair, String>,
    max_retries: u32,
}

impl HttpTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| anyhow::anyhow!("translator.endpoint required for http provider"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let models = LangPair::ALL
            .iter()
            .map(|pair| {
                let model = config
                    .models
                    .get(pair.as_str())
                    .cloned()
                    .unwrap_or_else(|| format!("opus-mt-{}", pair));
                (*pair, model)
            })
            .collect();

        Ok(Self {
            endpoint,
            client,
            models,
            max_retries: config.max_retries,
        })
    }

    /// Model identifier used for a pair.
    pub fn model_for(&self, pair: LangPair) -> &str {
        // The map is populated for every supported pair at construction.
        &self.models[&pair]
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, text: &str, pair: LangPair) -> Result<String, TranslatorError> {
        let body = serde_json::json!({
            "model": self.model_for(pair),
            "text": text,
            "lang_pair": pair.as_str(),
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.post(&self.endpoint).json(&body).send().await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await.map_err(|e| {
                            TranslatorError::InvalidResponse(e.to_string())
                        })?;
                        return parse_translation_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        warn!(status = %status, attempt, "translation backend error, retrying");
                        last_err = Some(TranslatorError::Http(format!(
                            "backend error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    return Err(TranslatorError::Http(format!(
                        "backend error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(TranslatorError::Http(e.to_string()));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| TranslatorError::Http("translation failed after retries".into())))
    }
}

fn parse_translation_response(json: &serde_json::Value) -> Result<String, TranslatorError> {
    json.get("translation")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| TranslatorError::InvalidResponse("missing 'translation' field".into()))
}

/// Create the appropriate [`Translator`] based on configuration.
///
/// Unknown provider names are configuration errors, surfaced immediately.
pub fn create_translator(config: &TranslatorConfig) -> Result<Box<dyn Translator>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledTranslator)),
        "http" => Ok(Box::new(HttpTranslator::new(config)?)),
        other => bail!("Unknown translator provider: {}", other),
    }
}

// ============ Output cleanup ============

/// Leading phrases a seq2seq model sometimes prepends to its output.
const BOILERPLATE_PREFIXES: [&str; 4] = [
    "I'm sorry",
    "I apologize",
    "Translation:",
    "Translated text:",
];

/// Normalize raw backend output: strip a leading boilerplate phrase,
/// collapse whitespace runs, and drop spaces left before punctuation.
pub fn clean_translation(text: &str) -> String {
    let mut rest = text.trim_start();
    for prefix in BOILERPLATE_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped.trim_start();
            break;
        }
    }

    let collapsed = rest.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        if matches!(c, '.' | ',' | '!' | '?') && out.ends_with(' ') {
            out.pop();
        }
        out.push(c);
    }
    out
}
