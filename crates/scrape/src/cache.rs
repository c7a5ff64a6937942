//! Newline-delimited cache of scraped cult titles.
//!
//! Scraping 27 pages takes a while and hammers the wiki for data that
//! changes rarely, so the title list is persisted to a plain text file
//! (one title per line). The guard in [`store_titles`] refuses to write
//! an empty list: a bad scrape must never overwrite a good cache with
//! nothing.

use crate::wiki;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read the cached title list, skipping blank lines.
pub fn load_cache(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading title cache {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Persist the title list, one title per line.
///
/// Refuses an empty list and errors before touching the file, so an
/// existing cache survives a failed scrape.
pub fn store_titles(path: &Path, titles: &[String]) -> Result<()> {
    if titles.is_empty() {
        bail!(
            "scrape produced no titles; leaving {} untouched",
            path.display()
        );
    }

    fs::write(path, titles.join("\n"))
        .with_context(|| format!("writing title cache {}", path.display()))?;
    info!("Stored {} cult titles in {}", titles.len(), path.display());
    Ok(())
}

/// Return the cult title list, scraping only when needed.
///
/// The cache short-circuits the scrape unless `refresh` is set or the
/// cache is missing or empty.
pub async fn load_or_scrape(client: &Client, path: &Path, refresh: bool) -> Result<Vec<String>> {
    if !refresh && path.exists() {
        let cached = load_cache(path)?;
        if !cached.is_empty() {
            info!(
                "Loaded {} cult titles from cache {}",
                cached.len(),
                path.display()
            );
            return Ok(cached);
        }
        warn!("Title cache {} is empty; scraping again", path.display());
    }

    let titles = wiki::scrape_all(client).await?;
    store_titles(path, &titles)?;
    Ok(titles)
}
