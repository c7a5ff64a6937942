//! Prediction explanations.
//!
//! Combines two signals into one report per feature:
//! - `weight`: the tree's global importance for the feature, identical
//!   for every request served by the same model
//! - `score`: how much the feature moved the probability of the
//!   predicted class for this particular movie, in percentage points
//!
//! Scores come from walking the movie's decision path and crediting
//! each probability shift to the feature that caused it, so a feature
//! the path never touches scores exactly zero.

use crate::error::{ModelError, Result};
use crate::tree::DecisionTree;
use pipeline::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One feature's part in a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    /// Probability shift for the predicted class, in percentage points
    pub score: f64,

    /// Normalized global importance of the feature
    pub weight: f64,

    /// Human-readable sentence for the UI
    pub details: String,
}

/// A full explanation of one model prediction
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// Predicted class (1 = cult)
    pub label: u8,

    /// Probability of the cult class, scaled to 0..=100
    pub probability: f64,

    /// Every schema feature, keyed by name
    pub factors: BTreeMap<String, Factor>,
}

/// Explain a single already-vectorized row
pub fn explain(tree: &DecisionTree, schema: &FeatureSchema, row: &[f64]) -> Result<Explanation> {
    if schema.len() != tree.n_features() {
        return Err(ModelError::SchemaMismatch {
            schema: schema.len(),
            tree: tree.n_features(),
        });
    }

    let proba = tree.predict_proba(row)?;
    let label: u8 = if proba[1] > proba[0] { 1 } else { 0 };
    let attribution = tree.feature_attributions(row)?;
    let importances = tree.feature_importances();

    let mut factors = BTreeMap::new();
    for (idx, name) in schema.feature_names().into_iter().enumerate() {
        let score = attribution.contributions[idx][label as usize] * 100.0;
        let details = describe_factor(&name, row[idx], score);
        factors.insert(
            name,
            Factor {
                score,
                weight: importances[idx],
                details,
            },
        );
    }

    Ok(Explanation {
        label,
        probability: proba[1] * 100.0,
        factors,
    })
}

/// One sentence per feature, phrased around the movie's actual value
fn describe_factor(name: &str, value: f64, score: f64) -> String {
    let direction = if score > 0.0 {
        "raised"
    } else if score < 0.0 {
        "lowered"
    } else {
        "did not move"
    };

    match name {
        "release_year" => format!("Release year {} {} the cult score", value as i32, direction),
        "runtime" => format!(
            "A runtime of {} minutes {} the cult score",
            value as i64, direction
        ),
        "revenue" => format!("Box office revenue of ${value:.0} {direction} the cult score"),
        "budget" => format!("A production budget of ${value:.0} {direction} the cult score"),
        "adult" => {
            if value >= 0.5 {
                format!("The adult rating {direction} the cult score")
            } else {
                format!("The all-audiences rating {direction} the cult score")
            }
        }
        genre => {
            if value >= 0.5 {
                format!("The {genre} genre tag {direction} the cult score")
            } else {
                format!("Missing the {genre} genre tag {direction} the cult score")
            }
        }
    }
}
