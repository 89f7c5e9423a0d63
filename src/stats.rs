//! Database statistics and health overview.
//!
//! Provides a quick summary of what the memory holds: document and
//! translation counts, how much of the history has been revised, and how
//! often segments are being reused. Used by `tmem stats` to give
//! confidence that the reuse machinery is actually saving work.

use anyhow::Result;

use crate::config::Config;
use crate::store::TranslationStore;

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let store = TranslationStore::open(config).await?;
    let stats = store.get_statistics().await;
    let db_size = store.db_size(config);

    println!("tmem — Translation Memory Stats");
    println!("===============================");
    println!();
    println!("  Database:      {}", config.db.path.display());
    println!("  Size:          {}", format_bytes(db_size));
    println!();
    println!("  Documents:     {}", stats.total_documents);
    println!("  Translations:  {}", stats.total_translations);
    println!("  Revision rate: {:.1}%", stats.revision_rate);
    println!("  Reuse rate:    {:.1}%", stats.reuse_rate);
    println!();

    store.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
