//! Conjunctive keyword search over indexed rows.
//!
//! A row matches when every surviving term is a substring of its lowercase
//! search text. Terms are trimmed and lowercased first; an empty surviving
//! set returns nothing rather than everything.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::error::SheetgrepError;
use crate::models::SearchHit;
use crate::sqlite_store::SqliteStore;
use crate::store::Store;

/// Trims, drops empties, and lowercases a raw term list.
pub fn normalize_terms<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|t| {
            let t = t.as_ref().trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_lowercase())
            }
        })
        .collect()
}

/// Parses the transport's raw `terms` value: a JSON string array, or, when
/// that fails to parse, the raw string as a single one-term search.
pub fn parse_raw_terms(raw: &str) -> Vec<String> {
    let terms: Vec<String> =
        serde_json::from_str(raw).unwrap_or_else(|_| vec![raw.to_string()]);
    normalize_terms(terms)
}

/// Runs a search for already-normalized terms.
pub async fn search_rows(
    store: &dyn Store,
    terms: &[String],
    limit: i64,
) -> Result<Vec<SearchHit>, SheetgrepError> {
    if terms.is_empty() {
        return Ok(Vec::new());
    }
    store.find_rows(terms, limit).await
}

/// CLI entry point: searches and prints matches.
pub async fn run_search(config: &Config, raw_terms: &[String], limit: Option<i64>) -> Result<()> {
    let terms = normalize_terms(raw_terms.iter().map(|s| s.as_str()));
    if terms.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool);
    let limit = limit.unwrap_or(config.search.result_limit);
    let hits = search_rows(&store, &terms, limit).await;
    store.close().await;
    let hits = hits?;

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} / {} / row {}",
            i + 1,
            hit.original_name,
            hit.sheet_name,
            hit.row_number
        );
        println!("    {}", hit.cells.join(" | "));
    }
    println!("{} result(s)", hits.len());
    Ok(())
}
