//! The `translate` (document) and `text` (ad-hoc) commands.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::engine::{ReuseEngine, SegmentOutcome, UnchangedReason};
use crate::models::LangPair;
use crate::progress::ProgressMode;
use crate::store::TranslationStore;
use crate::translator;

async fn build_engine(config: &Config) -> Result<ReuseEngine> {
    let store = TranslationStore::open(config).await?;
    let backend = translator::create_translator(&config.translator)?;
    Ok(ReuseEngine::new(store, backend, config.reuse.clone()))
}

/// Translate a document file and print (or write) the result.
pub async fn run_translate(
    config: &Config,
    file: &Path,
    pair: &str,
    output: Option<&Path>,
    progress: ProgressMode,
) -> Result<()> {
    // Unsupported pairs fail before anything is read or stored.
    let pair: LangPair = pair.parse()?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read document: {}", file.display()))?;

    let engine = build_engine(config).await?;
    let reporter = progress.reporter();
    let result = engine
        .translate_document(file, &content, pair, reporter.as_ref())
        .await;
    engine.close().await;

    let translated = result?;
    match output {
        Some(path) => {
            std::fs::write(path, &translated)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!("translated {} -> {}", file.display(), path.display());
        }
        None => println!("{}", translated),
    }
    Ok(())
}

/// Translate a single ad-hoc text snippet and print the result.
pub async fn run_text(config: &Config, text: &str, pair: &str) -> Result<()> {
    let pair: LangPair = pair.parse()?;

    let engine = build_engine(config).await?;
    let result = engine.translate_text(text, pair).await;
    engine.close().await;

    match result? {
        SegmentOutcome::Translated(translated) => println!("{}", translated),
        SegmentOutcome::Unchanged { text, reason } => {
            let note = match reason {
                UnchangedReason::NotTranslatable => "nothing to translate",
                UnchangedReason::TranslatorFailed => "translation failed, source returned",
            };
            eprintln!("unchanged ({})", note);
            println!("{}", text);
        }
    }
    Ok(())
}
