//! # Dataset Crate
//!
//! This crate turns the raw TMDB movie CSV dump into a cleaned, labeled
//! table ready for feature engineering.
//!
//! ## Main Components
//!
//! - **types**: Raw and cleaned row shapes, cleaning diagnostics
//! - **parser**: CSV ingestion into `RawMovieRecord`s
//! - **clean**: Cleaning rules and cult labeling
//! - **error**: Error types for dataset loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use dataset::{clean_records, read_movies_csv};
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let raw = read_movies_csv(Path::new("movies.csv"))?;
//! let cult_titles: HashSet<String> = load_titles_somehow();
//! let outcome = clean_records(raw, &cult_titles);
//!
//! println!("{} movies, {} cult", outcome.report.kept, outcome.report.cult);
//! ```
//!
//! ## Learning Goals
//!
//! This crate demonstrates several key Rust concepts:
//!
//! 1. **Tolerant deserialization**: `Option<T>` fields for a CSV full of holes
//! 2. **Error Handling**: Custom error types with record-level context
//! 3. **Parallel Processing**: Rayon for per-row cleaning
//! 4. **Invariants by construction**: `MovieRecord` can only be produced
//!    by the cleaning rules

// Public modules
pub mod clean;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used items for convenience
pub use clean::{CleanOutcome, clean_records};
pub use error::{DatasetError, Result};
pub use parser::{read_movies_csv, read_movies_from_reader};
pub use types::{CleanReport, GENRELESS, INDEPENDENT, MovieRecord, RawMovieRecord, TAG_SEPARATOR};
