//! # Scrape Crate
//!
//! Acquires the reference list of cult film titles from the wiki index
//! pages and keeps it cached on disk.
//!
//! ## Main Components
//!
//! - **wiki**: index page URLs, fetching, and title extraction
//! - **html**: tolerant hand-rolled HTML scanning helpers
//! - **cache**: newline-delimited title cache with an empty-scrape guard
//!
//! Extraction is deliberately forgiving about markup (tag case,
//! attribute order, inline citations) but strict about transport: any
//! failed page fetch aborts the run, and an empty scrape result is never
//! written over an existing cache.

// Public modules
pub mod cache;
pub mod html;
pub mod wiki;

// Re-export the high-level entry points
pub use cache::{load_cache, load_or_scrape, store_titles};
pub use wiki::{INDEX_BASE, build_client, extract_titles, index_urls, scrape_all};
