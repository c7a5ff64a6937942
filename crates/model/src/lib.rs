//! # Model Crate
//!
//! Trains, evaluates, persists, and explains the cult film classifier.
//! The classifier is a small gini decision tree built directly on the
//! feature rows produced by the `pipeline` crate.
//!
//! ## Main Components
//!
//! - **tree**: CART training, prediction, importances, path attribution
//! - **split**: seeded stratified train/test splitting
//! - **metrics**: accuracy / precision / recall / F1 on held-out rows
//! - **explain**: per-prediction factor reports for the API
//! - **artifact**: versioned bincode bundle of tree + schema
//! - **error**: error types shared by all of the above
//!
//! ## Example Usage
//!
//! ```ignore
//! use model::{stratified_split, DecisionTree, EvalReport, ModelArtifact, TreeParams};
//!
//! let split = stratified_split(&rows, &labels, 0.2, 42)?;
//! let tree = DecisionTree::fit(&split.x_train, &split.y_train, TreeParams::default())?;
//!
//! let predictions = tree.predict_batch(&split.x_test)?;
//! let report = model::evaluate(&split.y_test, &predictions)?;
//! println!("accuracy {:.3}, f1 {:.3}", report.accuracy, report.f1);
//!
//! ModelArtifact::new(schema, tree)?.save(Path::new("tree_model.bin"))?;
//! ```
//!
//! ## Learning Goals
//!
//! This crate demonstrates several key Rust concepts:
//!
//! 1. **Recursive data structures**: `Box`ed tree nodes with serde support
//! 2. **Parallelism**: rayon across features in the split search
//! 3. **Determinism**: seeded RNG and explicit tie-breaking rules
//! 4. **Versioned persistence**: format checks before trusting bytes

// Public modules
pub mod artifact;
pub mod error;
pub mod explain;
pub mod metrics;
pub mod split;
pub mod tree;

// Re-export the main API surface
pub use artifact::{ModelArtifact, ARTIFACT_VERSION};
pub use error::{ModelError, Result};
pub use explain::{explain, Explanation, Factor};
pub use metrics::{evaluate, EvalReport};
pub use split::{stratified_split, TrainTestSplit};
pub use tree::{Attribution, DecisionTree, TreeParams};
