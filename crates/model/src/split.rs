//! Deterministic stratified train/test splitting.
//!
//! Cult films are a small minority of the catalog, so a plain random
//! split can starve the test set of positives. Splitting within each
//! class keeps the class ratio identical on both sides, and a seeded
//! RNG makes every run reproducible.

use crate::error::{ModelError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// The four quadrants of a train/test split
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<u8>,
    pub x_test: Vec<Vec<f64>>,
    pub y_test: Vec<u8>,
}

/// Split rows into train and test sets, stratified by label.
///
/// Each class is shuffled with a `seed`-derived RNG and then
/// `round(count * test_fraction)` of its members go to the test set.
/// Rows keep their original relative order within each side.
pub fn stratified_split(
    rows: &[Vec<f64>],
    labels: &[u8],
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if rows.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if rows.len() != labels.len() {
        return Err(ModelError::LabelMismatch {
            rows: rows.len(),
            labels: labels.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidFraction(test_fraction));
    }
    if let Some(&bad) = labels.iter().find(|&&label| label > 1) {
        return Err(ModelError::InvalidLabel(bad));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut in_test = vec![false; rows.len()];

    for class in 0..=1u8 {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == class)
            .map(|(idx, _)| idx)
            .collect();
        members.shuffle(&mut rng);

        let n_test = (members.len() as f64 * test_fraction).round() as usize;
        for &idx in members.iter().take(n_test) {
            in_test[idx] = true;
        }
    }

    let mut split = TrainTestSplit {
        x_train: Vec::new(),
        y_train: Vec::new(),
        x_test: Vec::new(),
        y_test: Vec::new(),
    };
    for (idx, row) in rows.iter().enumerate() {
        if in_test[idx] {
            split.x_test.push(row.clone());
            split.y_test.push(labels[idx]);
        } else {
            split.x_train.push(row.clone());
            split.y_train.push(labels[idx]);
        }
    }

    debug!(
        "Split {} rows into {} train / {} test (fraction {})",
        rows.len(),
        split.x_train.len(),
        split.x_test.len(),
        test_fraction
    );
    Ok(split)
}
