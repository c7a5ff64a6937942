//! Decision Tree - Binary CART Classifier
//!
//! Trains a depth-limited classification tree with gini impurity and uses
//! it for prediction, class probabilities, and per-feature credit.
//!
//! ## Algorithm
//! 1. Start with all training rows at the root
//! 2. For every feature (in parallel), sort the rows by value and scan
//!    the midpoints between distinct neighbours as candidate thresholds
//! 3. Keep the threshold with the best gini gain; ties go to the
//!    lowest feature index so training is deterministic
//! 4. Partition rows (`value <= threshold` goes left) and recurse until
//!    the depth limit, a pure node, or no gain is left
//! 5. Leaves keep their class counts, which later become probabilities
//!
//! ## Learning Goals
//! - Recursive ownership with `Box` for tree nodes
//! - Rayon for parallel feature scans during training
//! - Index-based partitioning to avoid cloning the training matrix

use crate::error::{ModelError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Training hyperparameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum number of splits on any root-to-leaf path
    pub max_depth: usize,

    /// Smallest node that may still be split
    pub min_samples_split: usize,

    /// Minimum gini gain a split must achieve to be kept
    pub min_gain: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_samples_split: 2,
            min_gain: 0.0,
        }
    }
}

impl TreeParams {
    /// Configure the depth limit (default: 4)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Configure the smallest splittable node (default: 2)
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Configure the minimum gain threshold (default: 0.0)
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }
}

/// An internal split plus its two subtrees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Split {
    pub(crate) feature: usize,
    pub(crate) threshold: f64,
    pub(crate) gain: f64,
    pub(crate) left: Box<Node>,
    pub(crate) right: Box<Node>,
}

/// A tree node: every node keeps its training class counts, and only
/// internal nodes carry a split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Node {
    pub(crate) counts: [usize; 2],
    pub(crate) split: Option<Split>,
}

impl Node {
    pub(crate) fn n_samples(&self) -> usize {
        self.counts[0] + self.counts[1]
    }

    /// Class distribution of the training rows that reached this node
    pub(crate) fn proba(&self) -> [f64; 2] {
        let total = self.n_samples();
        if total == 0 {
            return [0.5, 0.5];
        }
        [
            self.counts[0] as f64 / total as f64,
            self.counts[1] as f64 / total as f64,
        ]
    }

}

/// Per-feature credit for a single prediction.
///
/// Walking from the root to a leaf, every split moves the class
/// distribution; that movement is credited to the split's feature.
/// The telescoping sum restores the leaf distribution exactly:
/// `baseline + sum(contributions) == leaf_proba` per class.
#[derive(Debug, Clone)]
pub struct Attribution {
    /// Class distribution at the root, before any split
    pub baseline: [f64; 2],

    /// Accumulated probability shift per feature, per class
    pub contributions: Vec<[f64; 2]>,

    /// Class distribution at the leaf the row landed in
    pub leaf_proba: [f64; 2],
}

/// A trained binary decision tree classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Node,
    n_features: usize,
    params: TreeParams,
}

impl DecisionTree {
    /// Train a tree on a feature matrix and binary labels.
    ///
    /// Rows must all share the same width and labels must be 0 or 1.
    #[instrument(skip(rows, labels), fields(n_rows = rows.len()))]
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], params: TreeParams) -> Result<Self> {
        if rows.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ModelError::LabelMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        validate_labels(labels)?;

        let n_features = rows[0].len();
        for row in rows {
            if row.len() != n_features {
                return Err(ModelError::FeatureMismatch {
                    expected: n_features,
                    found: row.len(),
                });
            }
        }

        let indices: Vec<usize> = (0..rows.len()).collect();
        let root = build_node(rows, labels, &indices, 0, &params);
        let tree = DecisionTree {
            root,
            n_features,
            params,
        };
        debug!(
            "Trained tree: depth {}, {} leaves, {} features",
            tree.depth(),
            tree.n_leaves(),
            tree.n_features
        );
        Ok(tree)
    }

    /// Predict the class of a single row (1 = cult)
    pub fn predict(&self, row: &[f64]) -> Result<u8> {
        let proba = self.predict_proba(row)?;
        Ok(if proba[1] > proba[0] { 1 } else { 0 })
    }

    /// Class probabilities `[p_not_cult, p_cult]` for a single row
    pub fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2]> {
        self.validate_row(row)?;
        let mut node = &self.root;
        while let Some(split) = &node.split {
            node = if row[split.feature] <= split.threshold {
                &split.left
            } else {
                &split.right
            };
        }
        Ok(node.proba())
    }

    /// Predict classes for a batch of rows
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Global feature importances, normalized to sum to 1.
    ///
    /// Each split contributes its gini gain weighted by the fraction of
    /// training rows that reached it. A tree with no splits returns all
    /// zeros.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut raw = vec![0.0; self.n_features];
        let total = self.root.n_samples() as f64;
        accumulate_importance(&self.root, total, &mut raw);

        let sum: f64 = raw.iter().sum();
        if sum > 0.0 {
            for value in &mut raw {
                *value /= sum;
            }
        }
        raw
    }

    /// Per-feature probability credit along the decision path of `row`
    pub fn feature_attributions(&self, row: &[f64]) -> Result<Attribution> {
        self.validate_row(row)?;

        let baseline = self.root.proba();
        let mut contributions = vec![[0.0; 2]; self.n_features];
        let mut current = baseline;
        let mut node = &self.root;

        while let Some(split) = &node.split {
            let child: &Node = if row[split.feature] <= split.threshold {
                &split.left
            } else {
                &split.right
            };
            let next = child.proba();
            contributions[split.feature][0] += next[0] - current[0];
            contributions[split.feature][1] += next[1] - current[1];
            current = next;
            node = child;
        }

        Ok(Attribution {
            baseline,
            contributions,
            leaf_proba: current,
        })
    }

    /// Feature width the tree was trained on
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Longest root-to-leaf path, in splits
    pub fn depth(&self) -> usize {
        node_depth(&self.root)
    }

    /// Number of leaf nodes
    pub fn n_leaves(&self) -> usize {
        count_leaves(&self.root)
    }

    fn validate_row(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                found: row.len(),
            });
        }
        Ok(())
    }
}

fn validate_labels(labels: &[u8]) -> Result<()> {
    if let Some(&bad) = labels.iter().find(|&&label| label > 1) {
        return Err(ModelError::InvalidLabel(bad));
    }
    Ok(())
}

// ============================================================
// Training internals
// ============================================================

/// A candidate split found during the threshold scan
struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn build_node(
    rows: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    depth: usize,
    params: &TreeParams,
) -> Node {
    let counts = class_counts(labels, indices);

    let pure = counts[0] == 0 || counts[1] == 0;
    if pure || depth >= params.max_depth || indices.len() < params.min_samples_split {
        return Node {
            counts,
            split: None,
        };
    }

    let candidate = match best_split(rows, labels, indices) {
        Some(candidate) if candidate.gain > params.min_gain => candidate,
        _ => {
            return Node {
                counts,
                split: None,
            }
        }
    };

    let (left_idx, right_idx) = partition(rows, indices, candidate.feature, candidate.threshold);
    let left = build_node(rows, labels, &left_idx, depth + 1, params);
    let right = build_node(rows, labels, &right_idx, depth + 1, params);

    Node {
        counts,
        split: Some(Split {
            feature: candidate.feature,
            threshold: candidate.threshold,
            gain: candidate.gain,
            left: Box::new(left),
            right: Box::new(right),
        }),
    }
}

/// Scan all features in parallel for the best threshold.
///
/// Ties on gain are broken towards the lowest feature index, so the
/// result does not depend on how rayon schedules the scan.
fn best_split(rows: &[Vec<f64>], labels: &[u8], indices: &[usize]) -> Option<Candidate> {
    if indices.len() < 2 {
        return None;
    }
    let n_features = rows[indices[0]].len();
    let parent_gini = gini(&class_counts(labels, indices));
    let n = indices.len() as f64;

    (0..n_features)
        .into_par_iter()
        .filter_map(|feature| best_threshold_for(rows, labels, indices, feature, parent_gini, n))
        .max_by(|a, b| match a.gain.partial_cmp(&b.gain).unwrap_or(Ordering::Equal) {
            Ordering::Equal => b.feature.cmp(&a.feature),
            other => other,
        })
}

/// Best threshold for one feature, or `None` if every value is equal
fn best_threshold_for(
    rows: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    feature: usize,
    parent_gini: f64,
    n: f64,
) -> Option<Candidate> {
    let mut order: Vec<usize> = indices.to_vec();
    order.sort_by(|&a, &b| {
        rows[a][feature]
            .partial_cmp(&rows[b][feature])
            .unwrap_or(Ordering::Equal)
    });

    let mut left = [0usize; 2];
    let mut right = class_counts(labels, indices);
    let mut best: Option<Candidate> = None;

    // Sweep the sorted rows, moving one sample at a time from right to
    // left, and rate the cut between each pair of distinct values.
    for position in 0..order.len() - 1 {
        let idx = order[position];
        let class = labels[idx] as usize;
        left[class] += 1;
        right[class] -= 1;

        let value = rows[idx][feature];
        let next_value = rows[order[position + 1]][feature];
        if value == next_value {
            continue;
        }

        // Midpoint between neighbours; clamp down so the cut stays
        // strictly below the next value and neither side goes empty.
        let mut threshold = (value + next_value) / 2.0;
        if threshold >= next_value {
            threshold = value;
        }

        let n_left = (position + 1) as f64;
        let n_right = n - n_left;
        let weighted = (n_left / n) * gini(&left) + (n_right / n) * gini(&right);
        let gain = parent_gini - weighted;

        let improved = match &best {
            Some(current) => gain > current.gain,
            None => true,
        };
        if improved {
            best = Some(Candidate {
                feature,
                threshold,
                gain,
            });
        }
    }

    best
}

fn partition(
    rows: &[Vec<f64>],
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &idx in indices {
        if rows[idx][feature] <= threshold {
            left.push(idx);
        } else {
            right.push(idx);
        }
    }
    (left, right)
}

fn class_counts(labels: &[u8], indices: &[usize]) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for &idx in indices {
        counts[labels[idx] as usize] += 1;
    }
    counts
}

/// Gini impurity of a two-class count
fn gini(counts: &[usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / total;
    let p1 = counts[1] as f64 / total;
    1.0 - p0 * p0 - p1 * p1
}

fn accumulate_importance(node: &Node, total: f64, raw: &mut [f64]) {
    if let Some(split) = &node.split {
        raw[split.feature] += (node.n_samples() as f64 / total) * split.gain;
        accumulate_importance(&split.left, total, raw);
        accumulate_importance(&split.right, total, raw);
    }
}

fn node_depth(node: &Node) -> usize {
    match &node.split {
        Some(split) => 1 + node_depth(&split.left).max(node_depth(&split.right)),
        None => 0,
    }
}

fn count_leaves(node: &Node) -> usize {
    match &node.split {
        Some(split) => count_leaves(&split.left) + count_leaves(&split.right),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four rows, one feature, perfectly separable at 0.5
    fn separable_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let rows = vec![vec![0.0], vec![0.0], vec![1.0], vec![1.0]];
        let labels = vec![0, 0, 1, 1];
        (rows, labels)
    }

    #[test]
    fn test_gini_values() {
        assert_eq!(gini(&[5, 5]), 0.5);
        assert_eq!(gini(&[10, 0]), 0.0);
        assert_eq!(gini(&[0, 10]), 0.0);
        assert_eq!(gini(&[0, 0]), 0.0);
        assert!((gini(&[3, 1]) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_fit_separable_single_split() {
        let (rows, labels) = separable_data();
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.predict(&[0.0]).unwrap(), 0);
        assert_eq!(tree.predict(&[1.0]).unwrap(), 1);
        // Midpoint threshold: the boundary itself goes left.
        assert_eq!(tree.predict(&[0.5]).unwrap(), 0);
    }

    #[test]
    fn test_pure_leaves_give_certain_probabilities() {
        let (rows, labels) = separable_data();
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        assert_eq!(tree.predict_proba(&[0.0]).unwrap(), [1.0, 0.0]);
        assert_eq!(tree.predict_proba(&[1.0]).unwrap(), [0.0, 1.0]);
    }

    #[test]
    fn test_midpoint_threshold_between_distinct_values() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let labels = vec![0, 0, 1, 1];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        // Best cut lies between 2.0 and 3.0, so 2.5 splits clean.
        assert_eq!(tree.predict(&[2.4]).unwrap(), 0);
        assert_eq!(tree.predict(&[2.5]).unwrap(), 0);
        assert_eq!(tree.predict(&[2.6]).unwrap(), 1);
    }

    #[test]
    fn test_max_depth_zero_is_majority_vote() {
        let rows = vec![vec![0.0], vec![1.0], vec![2.0]];
        let labels = vec![1, 1, 0];
        let params = TreeParams::default().with_max_depth(0);
        let tree = DecisionTree::fit(&rows, &labels, params).unwrap();

        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict(&[2.0]).unwrap(), 1);

        let proba = tree.predict_proba(&[0.0]).unwrap();
        assert!((proba[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pure_dataset_never_splits() {
        let rows = vec![vec![0.0], vec![5.0], vec![9.0]];
        let labels = vec![1, 1, 1];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.predict(&[100.0]).unwrap(), 1);
    }

    #[test]
    fn test_tied_features_pick_lowest_index() {
        // Both columns separate the classes equally well.
        let rows = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        let importances = tree.feature_importances();
        assert_eq!(importances, vec![1.0, 0.0]);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let rows = vec![
            vec![25.0, 0.0],
            vec![31.0, 0.0],
            vec![40.0, 1.0],
            vec![58.0, 1.0],
            vec![12.0, 0.0],
            vec![63.0, 1.0],
        ];
        let labels = vec![0, 0, 1, 1, 0, 1];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        let sum: f64 = tree.feature_importances().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stump_importances_are_zero() {
        let rows = vec![vec![0.0], vec![1.0]];
        let labels = vec![0, 1];
        let params = TreeParams::default().with_max_depth(0);
        let tree = DecisionTree::fit(&rows, &labels, params).unwrap();

        assert_eq!(tree.feature_importances(), vec![0.0]);
    }

    #[test]
    fn test_attribution_telescopes_to_leaf_proba() {
        let rows = vec![
            vec![1.0, 10.0],
            vec![2.0, 20.0],
            vec![3.0, 10.0],
            vec![4.0, 30.0],
            vec![5.0, 20.0],
            vec![6.0, 30.0],
        ];
        let labels = vec![0, 0, 1, 1, 1, 0];
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        for row in &rows {
            let attribution = tree.feature_attributions(row).unwrap();
            for class in 0..2 {
                let reconstructed: f64 = attribution.baseline[class]
                    + attribution
                        .contributions
                        .iter()
                        .map(|c| c[class])
                        .sum::<f64>();
                assert!((reconstructed - attribution.leaf_proba[class]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rejects_empty_dataset() {
        let result = DecisionTree::fit(&[], &[], TreeParams::default());
        assert!(matches!(result, Err(ModelError::EmptyTrainingSet)));
    }

    #[test]
    fn test_rejects_label_length_mismatch() {
        let rows = vec![vec![0.0], vec![1.0]];
        let result = DecisionTree::fit(&rows, &[0], TreeParams::default());
        assert!(matches!(
            result,
            Err(ModelError::LabelMismatch { rows: 2, labels: 1 })
        ));
    }

    #[test]
    fn test_rejects_non_binary_labels() {
        let rows = vec![vec![0.0], vec![1.0]];
        let result = DecisionTree::fit(&rows, &[0, 3], TreeParams::default());
        assert!(matches!(result, Err(ModelError::InvalidLabel(3))));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        let result = DecisionTree::fit(&rows, &[0, 1], TreeParams::default());
        assert!(matches!(
            result,
            Err(ModelError::FeatureMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (rows, labels) = separable_data();
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        let result = tree.predict(&[0.0, 1.0]);
        assert!(matches!(
            result,
            Err(ModelError::FeatureMismatch {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_depth_limit_is_respected() {
        // Alternating labels force a deep tree if unconstrained.
        let rows: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64]).collect();
        let labels: Vec<u8> = (0..32).map(|i| (i % 2) as u8).collect();
        let tree = DecisionTree::fit(&rows, &labels, TreeParams::default()).unwrap();

        assert!(tree.depth() <= 4);
    }
}
