//! CSV ingestion for the TMDB movie dump.
//!
//! The dump is a wide, headered CSV with plenty of columns we never
//! look at. Deserialization goes straight into [`RawMovieRecord`]:
//! columns are matched by header name, unknown columns are skipped, and
//! empty fields become `None`.
//!
//! Rust concepts demonstrated here:
//! - serde integration of the csv crate
//! - Attaching record-level context to parse errors
//! - Generic functions over `io::Read` so tests can parse from memory

use crate::error::{DatasetError, Result};
use crate::types::RawMovieRecord;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Read the movie table from a CSV file on disk.
pub fn read_movies_csv(path: &Path) -> Result<Vec<RawMovieRecord>> {
    if !path.exists() {
        return Err(DatasetError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = File::open(path)?;
    read_movies_from_reader(file, &path.display().to_string())
}

/// Read the movie table from any reader.
///
/// `source` is only used in error messages, so parse failures still
/// point somewhere useful when the input didn't come from a file.
pub fn read_movies_from_reader<R: io::Read>(input: R, source: &str) -> Result<Vec<RawMovieRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawMovieRecord>().enumerate() {
        let record = row.map_err(|e| DatasetError::CsvError {
            file: source.to_string(),
            record: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }

    debug!("Read {} raw movie records from {}", records.len(), source);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
id,title,release_date,revenue,runtime,adult,budget,original_language,overview,tagline,genres,production_companies,keywords
27205,Inception,2010-07-15,825532764,148,False,160000000,en,A thief enters dreams.,Your mind is the scene of the crime.,\"Action, Science Fiction\",Legendary Pictures,dream
985,Eraserhead,1977-03-19,7000000,89,False,10000,en,A man in an industrial wasteland.,,\"Horror, Fantasy\",,surreal
111,No Numbers,,,,,,en,,,,,
";

    #[test]
    fn test_read_sample_rows() {
        let records = read_movies_from_reader(SAMPLE_CSV.as_bytes(), "sample").unwrap();
        assert_eq!(records.len(), 3);

        let inception = &records[0];
        assert_eq!(inception.title.as_deref(), Some("Inception"));
        assert_eq!(inception.release_date.as_deref(), Some("2010-07-15"));
        assert_eq!(inception.runtime, Some(148.0));
        assert_eq!(inception.adult.as_deref(), Some("False"));
        assert_eq!(inception.genres.as_deref(), Some("Action, Science Fiction"));
    }

    #[test]
    fn test_empty_fields_become_none() {
        let records = read_movies_from_reader(SAMPLE_CSV.as_bytes(), "sample").unwrap();
        let bare = &records[2];

        assert_eq!(bare.title.as_deref(), Some("No Numbers"));
        assert_eq!(bare.release_date, None);
        assert_eq!(bare.revenue, None);
        assert_eq!(bare.runtime, None);
        assert_eq!(bare.budget, None);
        assert_eq!(bare.genres, None);
        assert_eq!(bare.production_companies, None);
    }

    #[test]
    fn test_unknown_columns_are_skipped() {
        // The id column isn't part of RawMovieRecord and must not break parsing
        let records = read_movies_from_reader(SAMPLE_CSV.as_bytes(), "sample").unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = read_movies_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::FileNotFound { .. }));
    }

    #[test]
    fn test_bad_record_reports_position() {
        let csv = "\
title,runtime
Fine Movie,100
Broken Movie,not-a-number
";
        let err = read_movies_from_reader(csv.as_bytes(), "bad.csv").unwrap_err();
        match err {
            DatasetError::CsvError { file, record, .. } => {
                assert_eq!(file, "bad.csv");
                assert_eq!(record, 2);
            }
            other => panic!("expected CsvError, got {:?}", other),
        }
    }
}
