//! The `history` command: reverse-chronological translation log.

use anyhow::Result;

use crate::config::Config;
use crate::store::TranslationStore;

pub async fn run_history(config: &Config) -> Result<()> {
    let store = TranslationStore::open(config).await?;
    let entries = store.get_translation_history().await;

    if entries.is_empty() {
        println!("No translations yet.");
        store.close().await;
        return Ok(());
    }

    println!(
        "  {:<28} {:<17} {:<8} {:<12} {:<12} {}",
        "FILE", "DATE", "PAIR", "STATUS", "REVISOR", "SCORE"
    );
    println!("  {}", "-".repeat(84));

    for entry in &entries {
        println!(
            "  {:<28} {:<17} {:<8} {:<12} {:<12} {}",
            entry.file_name,
            format_ts(entry.date),
            entry.lang_pair,
            entry.status,
            entry.revisor,
            entry.score
        );
    }

    store.close().await;
    Ok(())
}

fn format_ts(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
