//! Cleaning and labeling of the raw movie table.
//!
//! Turns a pile of [`RawMovieRecord`]s into [`MovieRecord`]s that the
//! feature pipeline can trust, applying the rules in a fixed order:
//!
//! 1. Label: cult = true iff the title exactly matches a scraped entry
//! 2. Drop rows with no title
//! 3. Drop duplicate titles (first occurrence wins)
//! 4. Coerce the release date; unparseable or missing means drop
//! 5. Coerce the adult flag to a bool
//! 6. Drop rows where runtime, revenue or budget is zero (or missing)
//! 7. Fill missing production companies with [`INDEPENDENT`]
//! 8. Fill missing genres with [`GENRELESS`]
//!
//! Deduplication is inherently sequential, so it runs first on one
//! thread; everything after it is per-row and runs under Rayon. Output
//! order always follows input order.

use crate::types::{CleanReport, GENRELESS, INDEPENDENT, MovieRecord, RawMovieRecord};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// Cleaned records plus the per-rule drop counts.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub records: Vec<MovieRecord>,
    pub report: CleanReport,
}

/// What happened to a single titled row.
enum RowOutcome {
    Kept(MovieRecord),
    BadReleaseDate,
    ZeroFinancials,
}

/// Clean and label the raw movie table.
///
/// `cult_titles` is the scraped reference list; matching is exact, so a
/// title must appear verbatim to receive the label.
pub fn clean_records(raw: Vec<RawMovieRecord>, cult_titles: &HashSet<String>) -> CleanOutcome {
    let input_rows = raw.len();

    // Title rules need global state (the seen-set), so this pass is sequential.
    let mut seen: HashSet<String> = HashSet::new();
    let mut titled = Vec::with_capacity(raw.len());
    let mut missing_title = 0usize;
    let mut duplicate_title = 0usize;

    for record in raw {
        match record.title.as_deref() {
            None => missing_title += 1,
            Some(title) if seen.contains(title) => duplicate_title += 1,
            Some(title) => {
                seen.insert(title.to_string());
                titled.push(record);
            }
        }
    }

    // Everything else is per-row; par_iter keeps input order in the output.
    let outcomes: Vec<RowOutcome> = titled
        .into_par_iter()
        .map(|record| clean_single(record, cult_titles))
        .collect();

    let mut records = Vec::with_capacity(outcomes.len());
    let mut bad_release_date = 0usize;
    let mut zero_financials = 0usize;
    let mut cult = 0usize;

    for outcome in outcomes {
        match outcome {
            RowOutcome::Kept(record) => {
                if record.cult {
                    cult += 1;
                }
                records.push(record);
            }
            RowOutcome::BadReleaseDate => bad_release_date += 1,
            RowOutcome::ZeroFinancials => zero_financials += 1,
        }
    }

    let report = CleanReport {
        input_rows,
        missing_title,
        duplicate_title,
        bad_release_date,
        zero_financials,
        kept: records.len(),
        cult,
    };

    info!(
        "Cleaned movie table: kept {} of {} rows ({} cult)",
        report.kept, report.input_rows, report.cult
    );

    CleanOutcome { records, report }
}

/// Apply the per-row rules to one titled record.
fn clean_single(record: RawMovieRecord, cult_titles: &HashSet<String>) -> RowOutcome {
    // The sequential pass already guaranteed the title is present.
    let title = record.title.unwrap_or_default();

    let Some(release_date) = record.release_date.as_deref().and_then(parse_release_date) else {
        return RowOutcome::BadReleaseDate;
    };

    let runtime = record.runtime.unwrap_or(0.0);
    let revenue = record.revenue.unwrap_or(0.0);
    let budget = record.budget.unwrap_or(0.0);
    if runtime == 0.0 || revenue == 0.0 || budget == 0.0 {
        return RowOutcome::ZeroFinancials;
    }

    let cult = cult_titles.contains(&title);

    RowOutcome::Kept(MovieRecord {
        title,
        release_date,
        release_year: release_date.year(),
        runtime,
        revenue,
        budget,
        adult: parse_adult_flag(record.adult.as_deref()),
        original_language: record.original_language.unwrap_or_default(),
        genres: fill_missing(record.genres, GENRELESS),
        tagline: record.tagline.unwrap_or_default(),
        production_companies: fill_missing(record.production_companies, INDEPENDENT),
        keywords: record.keywords.unwrap_or_default(),
        overview: record.overview.unwrap_or_default(),
        cult,
    })
}

/// Parse the dump's `YYYY-MM-DD` release dates.
fn parse_release_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Coerce the textual adult flag. Anything other than a truthy marker
/// counts as not adult.
fn parse_adult_flag(value: Option<&str>) -> bool {
    matches!(value, Some(s) if s.trim().eq_ignore_ascii_case("true"))
}

/// Replace a missing or blank multi-value field with a sentinel.
fn fill_missing(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => sentinel.to_string(),
    }
}
