//! Binary classification metrics.
//!
//! Everything is computed from the confusion matrix with the cult
//! class (label 1) as the positive class. Undefined ratios (for
//! example precision when nothing was predicted positive) report 0.0
//! instead of NaN.

use crate::error::{ModelError, Result};
use serde::Serialize;

/// Held-out evaluation summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,

    /// Number of evaluated rows
    pub support: usize,

    /// Number of true positives in the ground truth
    pub positives: usize,
}

/// Compare predictions against ground truth labels
pub fn evaluate(y_true: &[u8], y_pred: &[u8]) -> Result<EvalReport> {
    if y_true.len() != y_pred.len() {
        return Err(ModelError::LabelMismatch {
            rows: y_true.len(),
            labels: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ModelError::EmptyEvaluation);
    }

    let mut true_pos = 0usize;
    let mut true_neg = 0usize;
    let mut false_pos = 0usize;
    let mut false_neg = 0usize;

    for (&truth, &pred) in y_true.iter().zip(y_pred) {
        match (truth, pred) {
            (1, 1) => true_pos += 1,
            (0, 0) => true_neg += 1,
            (0, 1) => false_pos += 1,
            (1, 0) => false_neg += 1,
            _ => return Err(ModelError::InvalidLabel(truth.max(pred))),
        }
    }

    let accuracy = (true_pos + true_neg) as f64 / y_true.len() as f64;
    let precision = ratio(true_pos, true_pos + false_pos);
    let recall = ratio(true_pos, true_pos + false_neg);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(EvalReport {
        accuracy,
        precision,
        recall,
        f1,
        support: y_true.len(),
        positives: true_pos + false_neg,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
