use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub reuse: ReuseConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Reuse policy knobs. The numeric defaults match the tool's historical
/// behavior but are deliberately configuration, not constants.
#[derive(Debug, Deserialize, Clone)]
pub struct ReuseConfig {
    /// Minimum similarity for a stored segment to count as a match.
    #[serde(default = "default_segment_threshold")]
    pub segment_threshold: f64,
    /// Similarity at or above which a match is reused verbatim without
    /// calling the translation backend. Inclusive boundary.
    #[serde(default = "default_reuse_cutoff")]
    pub reuse_cutoff: f64,
    /// Minimum similarity for document-level near-duplicate reporting.
    #[serde(default = "default_document_threshold")]
    pub document_threshold: f64,
    /// Age limit below which an existing document translation is returned
    /// instead of re-translating.
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: i64,
    /// Segments at or below this many characters skip the reuse lookup.
    #[serde(default = "default_min_lookup_chars")]
    pub min_lookup_chars: usize,
    /// How many recently uploaded documents the similarity scan reads.
    #[serde(default = "default_recent_documents")]
    pub recent_documents: i64,
    /// How many recently used segments a match query considers.
    #[serde(default = "default_recent_segments")]
    pub recent_segments: i64,
}

impl Default for ReuseConfig {
    fn default() -> Self {
        Self {
            segment_threshold: default_segment_threshold(),
            reuse_cutoff: default_reuse_cutoff(),
            document_threshold: default_document_threshold(),
            freshness_hours: default_freshness_hours(),
            min_lookup_chars: default_min_lookup_chars(),
            recent_documents: default_recent_documents(),
            recent_segments: default_recent_segments(),
        }
    }
}

fn default_segment_threshold() -> f64 {
    0.9
}
fn default_reuse_cutoff() -> f64 {
    0.95
}
fn default_document_threshold() -> f64 {
    0.8
}
fn default_freshness_hours() -> i64 {
    24
}
fn default_min_lookup_chars() -> usize {
    10
}
fn default_recent_documents() -> i64 {
    50
}
fn default_recent_segments() -> i64 {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Endpoint of the HTTP translation backend, e.g.
    /// `http://localhost:8089/translate`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-pair model identifiers, keyed by language pair code.
    #[serde(default)]
    pub models: HashMap<String, String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            models: HashMap::new(),
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    5
}

impl TranslatorConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let reuse = &config.reuse;
    for (name, value) in [
        ("reuse.segment_threshold", reuse.segment_threshold),
        ("reuse.reuse_cutoff", reuse.reuse_cutoff),
        ("reuse.document_threshold", reuse.document_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            anyhow::bail!("{} must be in [0.0, 1.0]", name);
        }
    }

    if reuse.reuse_cutoff < reuse.segment_threshold {
        anyhow::bail!("reuse.reuse_cutoff must be >= reuse.segment_threshold");
    }

    if reuse.freshness_hours < 0 {
        anyhow::bail!("reuse.freshness_hours must be >= 0");
    }

    if reuse.recent_documents < 1 {
        anyhow::bail!("reuse.recent_documents must be >= 1");
    }

    if reuse.recent_segments < 1 {
        anyhow::bail!("reuse.recent_segments must be >= 1");
    }

    match config.translator.provider.as_str() {
        "disabled" => {}
        "http" => {
            if config.translator.endpoint.is_none() {
                anyhow::bail!("translator.endpoint must be set when provider is 'http'");
            }
        }
        other => anyhow::bail!(
            "Unknown translator provider: '{}'. Must be disabled or http.",
            other
        ),
    }

    Ok(())
}
