//! Cult-film list acquisition from the wiki index pages.
//!
//! The reference list of cult films is spread across 27 alphabetical
//! index pages. Each page carries one or more `wikitable` listing
//! tables where the first link of every row is the film title.
//!
//! Failure policy: any non-success fetch aborts the whole acquisition.
//! A partially scraped list would silently mislabel the dataset, which
//! is worse than no list at all.

use crate::html;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Common prefix of the index page URLs
pub const INDEX_BASE: &str = "https://en.wikipedia.org/wiki/List_of_cult_films:_";

/// User agent sent with every fetch; the wiki asks clients to identify
/// themselves
const USER_AGENT: &str = "cult-calc/0.1 (cult film dataset builder)";

/// Per-request timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Page suffixes in scrape order: the numeric bucket, then A through Z.
///
/// The numeric bucket uses an en dash (`0–9`) because that is the actual
/// page name.
pub fn index_suffixes() -> Vec<String> {
    let mut suffixes = vec!["0\u{2013}9".to_string()];
    suffixes.extend(('A'..='Z').map(|c| c.to_string()));
    suffixes
}

/// Full URLs of all 27 index pages.
pub fn index_urls() -> Vec<String> {
    index_suffixes()
        .iter()
        .map(|suffix| format!("{INDEX_BASE}{suffix}"))
        .collect()
}

/// Build the shared HTTP client used for all index fetches.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building HTTP client")
}

/// Fetch one page, treating any non-success status as fatal.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    debug!("Fetching {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("GET {url} returned {status}");
    }

    response
        .text()
        .await
        .with_context(|| format!("reading body of {url}"))
}

/// Pull film titles out of one index page.
///
/// Only `wikitable`-classed tables are scanned, so navboxes and
/// infoboxes never leak titles in. Within each table the first row is
/// the header; after that, the first link of a row is the film title.
/// Rows without a link (spacers, stray markup) are skipped.
pub fn extract_titles(page: &str) -> Vec<String> {
    let mut titles = Vec::new();
    for table in html::tables_with_class(page, "wikitable") {
        for (row_idx, row) in html::element_blocks(table, "tr").iter().enumerate() {
            if row_idx == 0 {
                continue;
            }
            if let Some(title) = html::first_anchor_text(row.inner) {
                titles.push(title);
            }
        }
    }
    titles
}

/// Scrape every index page in order and concatenate the titles.
pub async fn scrape_all(client: &Client) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    for url in index_urls() {
        let page = fetch_page(client, &url).await?;
        let page_titles = extract_titles(&page);
        info!("Scraped {} titles from {}", page_titles.len(), url);
        titles.extend(page_titles);
    }
    info!("Scraped {} cult film titles in total", titles.len());
    Ok(titles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r##"<html><body>
<table class="infobox"><tr><td><a href="/wiki/Main">Navigation junk</a></td></tr></table>
<h2>Listing</h2>
<table class="wikitable sortable">
<tr><th>Film</th><th>Year</th><th>Director</th></tr>
<TR><td><i><a href="/wiki/2001">2001: A Space Odyssey</a></i><sup><a href="#c1">[1]</a></sup></td><td>1968</td><td><a href="/wiki/SK">Stanley Kubrick</a></td></TR>
<tr><td><a href="/wiki/Freaks">Freaks</a></td><td>1932</td><td>Tod Browning</td></tr>
<tr><td></td><td>spacer row</td><td></td></tr>
</table>
<table class="wikitable">
<tr><th>Film</th></tr>
<tr><td><a href="/wiki/Bugs">A Bug&#39;s Life</a></td></tr>
</table>
</body></html>"##;

    #[test]
    fn test_extract_titles_from_fixture() {
        let titles = extract_titles(FIXTURE);
        assert_eq!(
            titles,
            vec!["2001: A Space Odyssey", "Freaks", "A Bug's Life"]
        );
    }

    #[test]
    fn test_extract_skips_non_listing_tables() {
        let titles = extract_titles(FIXTURE);
        assert!(!titles.iter().any(|t| t.contains("Navigation")));
    }

    #[test]
    fn test_extract_titles_empty_page() {
        assert!(extract_titles("<html><body>nothing here</body></html>").is_empty());
    }

    #[test]
    fn test_index_urls_cover_all_buckets() {
        let urls = index_urls();
        assert_eq!(urls.len(), 27);
        assert_eq!(urls[0], format!("{INDEX_BASE}0\u{2013}9"));
        assert_eq!(urls[1], format!("{INDEX_BASE}A"));
        assert_eq!(urls[26], format!("{INDEX_BASE}Z"));
    }
}
