//! The `get` command: show a stored document by id.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::store::TranslationStore;

pub async fn run_get(config: &Config, id: i64) -> Result<()> {
    let store = TranslationStore::open(config).await?;
    let document = store.get_document_info(id).await?;
    store.close().await;

    let Some(doc) = document else {
        bail!("Document not found: {}", id);
    };

    println!("Document {}", doc.id);
    println!("  file:     {}", doc.file_name);
    println!("  path:     {}", doc.original_path);
    println!("  type:     {}", doc.file_type);
    println!("  status:   {}", doc.status);
    println!("  uploaded: {}", format_ts(doc.upload_date));
    if let Some(metadata) = &doc.metadata {
        println!("  metadata: {}", metadata);
    }
    Ok(())
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
