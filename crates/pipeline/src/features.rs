//! Feature vector construction.
//!
//! Both halves of the system funnel through this module: the builder
//! vectorizes every cleaned record before training, and the service
//! vectorizes the single submitted movie before predicting. Keeping the
//! two paths side by side here is what guarantees they agree on the
//! layout.
//!
//! Vectorization is pure and deterministic: the same record and schema
//! always produce the identical vector.

use crate::input::MovieInput;
use crate::schema::FeatureSchema;
use dataset::MovieRecord;
use rayon::prelude::*;
use std::collections::HashSet;

/// Vectorize one cleaned training record.
pub fn vectorize_record(record: &MovieRecord, schema: &FeatureSchema) -> Vec<f64> {
    let mut row = Vec::with_capacity(schema.len());
    row.push(record.release_year as f64);
    row.push(record.runtime);
    row.push(record.revenue);
    row.push(if record.adult { 1.0 } else { 0.0 });
    row.push(record.budget);
    push_genre_indicators(&mut row, record.genre_tokens(), schema);
    row
}

/// Vectorize a submitted movie against a trained model's schema.
///
/// A genre tag absent from the vocabulary contributes to no indicator
/// column: the genre block simply stays zero.
pub fn vectorize_input(input: &MovieInput, schema: &FeatureSchema) -> Vec<f64> {
    let mut row = Vec::with_capacity(schema.len());
    row.push(input.year as f64);
    row.push(input.runtime as f64);
    row.push(input.revenue);
    row.push(if input.adult { 1.0 } else { 0.0 });
    row.push(input.budget);
    push_genre_indicators(&mut row, input.genre_tokens(), schema);
    row
}

/// Vectorize the whole cleaned table, returning rows and cult labels in
/// input order.
pub fn vectorize_dataset(records: &[MovieRecord], schema: &FeatureSchema) -> (Vec<Vec<f64>>, Vec<u8>) {
    let rows = records
        .par_iter()
        .map(|record| vectorize_record(record, schema))
        .collect();
    let labels = records.iter().map(|record| record.cult as u8).collect();
    (rows, labels)
}

/// Append one 0/1 column per vocabulary genre, matched token-exactly.
fn push_genre_indicators<'a>(
    row: &mut Vec<f64>,
    tokens: impl Iterator<Item = &'a str>,
    schema: &FeatureSchema,
) {
    let present: HashSet<&str> = tokens.collect();
    for genre in schema.genres() {
        row.push(if present.contains(genre.as_str()) {
            1.0
        } else {
            0.0
        });
    }
}
