//! Core domain types for the movie metadata table.
//!
//! This module defines the two shapes a movie takes on its way through
//! the dataset builder:
//! - [`RawMovieRecord`]: a row exactly as it comes out of the TMDB CSV
//!   dump, where every field may be missing
//! - [`MovieRecord`]: a cleaned, labeled row where every field is
//!   guaranteed present and typed
//!
//! Rust concepts demonstrated here:
//! - `Option<T>` for fields that may be absent in the source data
//! - Derive macros for serde (de)serialization
//! - Structs with public fields and small helper methods

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel genre for movies with no genre tags
pub const GENRELESS: &str = "Genreless";

/// Sentinel production company for movies without one
pub const INDEPENDENT: &str = "Independent";

/// Separator between tags in the TMDB multi-value columns
/// (e.g. `"Horror, Thriller"`)
pub const TAG_SEPARATOR: &str = ", ";

// =============================================================================
// Raw CSV row
// =============================================================================

/// One row of the TMDB movie CSV, before any cleaning.
///
/// All fields are optional because the dump is full of holes; the csv
/// crate maps empty fields to `None`. Columns we never use (vote counts,
/// poster paths, ...) are simply not listed and get skipped during
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    /// Stored as text (`"True"`/`"False"` in the dump); coerced during cleaning
    #[serde(default)]
    pub adult: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    /// Comma-separated genre tags, e.g. `"Horror, Thriller"`
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub production_companies: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

// =============================================================================
// Cleaned, labeled row
// =============================================================================

/// A movie that survived cleaning, with the cult label attached.
///
/// Invariants guaranteed by [`crate::clean::clean_records`]:
/// - `title` is non-empty and unique within one cleaned table
/// - `release_date` parsed, and `release_year` agrees with it
/// - `runtime`, `revenue` and `budget` are all non-zero
/// - `genres` is non-empty (missing tags become [`GENRELESS`])
/// - `production_companies` is non-empty (missing becomes [`INDEPENDENT`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub release_date: NaiveDate,
    pub release_year: i32,
    pub runtime: f64,
    pub revenue: f64,
    pub budget: f64,
    pub adult: bool,
    pub original_language: String,
    pub genres: String,
    pub tagline: String,
    pub production_companies: String,
    pub keywords: String,
    pub overview: String,
    /// True iff the title appears on the scraped cult-film list
    pub cult: bool,
}

impl MovieRecord {
    /// Split the genre string into individual tags.
    ///
    /// `"Horror, Thriller"` yields `["Horror", "Thriller"]`. The string
    /// is never empty, so this always yields at least one tag.
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genres.split(TAG_SEPARATOR)
    }
}

// =============================================================================
// Cleaning diagnostics
// =============================================================================

/// Per-rule drop counts from one cleaning run.
///
/// These are purely diagnostic; the CLI prints them so a surprising
/// model can be traced back to a surprising input table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Rows in the raw CSV
    pub input_rows: usize,
    /// Dropped: no title at all
    pub missing_title: usize,
    /// Dropped: same title seen earlier in the file
    pub duplicate_title: usize,
    /// Dropped: release date absent or unparseable
    pub bad_release_date: usize,
    /// Dropped: runtime, revenue or budget was zero/missing
    pub zero_financials: usize,
    /// Rows that survived every rule
    pub kept: usize,
    /// Of the kept rows, how many carry the cult label
    pub cult: usize,
}

impl CleanReport {
    /// Total number of dropped rows across all rules
    pub fn dropped(&self) -> usize {
        self.missing_title + self.duplicate_title + self.bad_release_date + self.zero_financials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_tokens() {
        let record = MovieRecord {
            title: "Eraserhead".to_string(),
            release_date: NaiveDate::from_ymd_opt(1977, 3, 19).unwrap(),
            release_year: 1977,
            runtime: 89.0,
            revenue: 7_000_000.0,
            budget: 10_000.0,
            adult: false,
            original_language: "en".to_string(),
            genres: "Horror, Fantasy".to_string(),
            tagline: String::new(),
            production_companies: INDEPENDENT.to_string(),
            keywords: String::new(),
            overview: String::new(),
            cult: true,
        };

        let tokens: Vec<&str> = record.genre_tokens().collect();
        assert_eq!(tokens, vec!["Horror", "Fantasy"]);
    }

    #[test]
    fn test_clean_report_dropped() {
        let report = CleanReport {
            input_rows: 10,
            missing_title: 1,
            duplicate_title: 2,
            bad_release_date: 1,
            zero_financials: 3,
            kept: 3,
            cult: 1,
        };

        assert_eq!(report.dropped(), 7);
        assert_eq!(report.dropped() + report.kept, report.input_rows);
    }
}
