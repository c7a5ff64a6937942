//! The frozen feature layout shared by training and serving.
//!
//! A trained tree is only meaningful against the exact column order it
//! was fit on, so the layout is captured once at training time in a
//! [`FeatureSchema`] and travels with the model from then on. Nothing
//! outside this module decides what position a feature lives at.
//!
//! ## Layout
//!
//! The five canonical numeric features come first, in a fixed order,
//! followed by one binary indicator column per genre in the order the
//! genres were first seen in the training table:
//!
//! ```text
//! [release_year, runtime, revenue, adult, budget, <genre 0>, <genre 1>, ...]
//! ```

use dataset::MovieRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// The canonical numeric features, in column order.
pub const NUMERIC_FEATURES: [&str; 5] = ["release_year", "runtime", "revenue", "adult", "budget"];

/// Bumped whenever the layout rules above change shape.
pub const SCHEMA_VERSION: u16 = 1;

/// A frozen feature layout: version tag plus the genre vocabulary.
///
/// Equality compares the whole layout, which makes schema agreement
/// checks a plain `==`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    version: u16,
    genres: Vec<String>,
}

impl FeatureSchema {
    /// Derive the genre vocabulary from a cleaned training table.
    ///
    /// Tokens are collected in first-seen order, so the same table
    /// always produces the same column layout.
    pub fn from_records(records: &[MovieRecord]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut genres = Vec::new();

        for record in records {
            for token in record.genre_tokens() {
                if seen.insert(token) {
                    genres.push(token.to_string());
                }
            }
        }

        debug!(
            "Built feature schema: {} numeric + {} genre columns",
            NUMERIC_FEATURES.len(),
            genres.len()
        );
        Self::from_genres(genres)
    }

    /// Build a schema from an explicit genre vocabulary.
    pub fn from_genres(genres: Vec<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            genres,
        }
    }

    /// Layout version this schema was written with.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Genre vocabulary in column order.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Column index where the genre indicator block starts.
    pub fn genre_offset(&self) -> usize {
        NUMERIC_FEATURES.len()
    }

    /// Total number of feature columns.
    pub fn len(&self) -> usize {
        NUMERIC_FEATURES.len() + self.genres.len()
    }

    /// All feature names in column order: numerics first, then genres.
    pub fn feature_names(&self) -> Vec<String> {
        NUMERIC_FEATURES
            .iter()
            .map(|name| name.to_string())
            .chain(self.genres.iter().cloned())
            .collect()
    }
}
