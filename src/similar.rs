//! The `similar` command: rank stored documents against a file.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::store::TranslationStore;

pub async fn run_similar(config: &Config, file: &Path, threshold: Option<f64>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read document: {}", file.display()))?;
    let threshold = threshold.unwrap_or(config.reuse.document_threshold);

    let store = TranslationStore::open(config).await?;
    let similar = store.find_similar_documents(&content, threshold).await;

    if similar.is_empty() {
        println!("No similar documents.");
        store.close().await;
        return Ok(());
    }

    for (i, (doc_id, score)) in similar.iter().enumerate() {
        let name = store
            .get_document_info(*doc_id)
            .await?
            .map(|d| d.file_name)
            .unwrap_or_else(|| "(unknown)".to_string());
        println!("{}. [{:.2}] {}  (id: {})", i + 1, score, name, doc_id);
    }

    store.close().await;
    Ok(())
}
