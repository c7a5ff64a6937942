//! Pipeline for turning movies into model-ready feature vectors.
//!
//! This crate provides:
//! - `FeatureSchema`: the frozen column layout (numerics + genre vocabulary)
//! - `MovieInput`: the inference-side movie description
//! - vectorization for training records and for single submitted movies
//!
//! ## Architecture
//! The layout is derived exactly once, from the cleaned training table,
//! and then travels with the trained model. Training and serving both
//! vectorize through this crate, so a movie submitted to the service is
//! encoded with the very code that encoded the training set:
//!
//! ```text
//! MovieRecord ──vectorize_record──┐
//!                                 ├── [f64; schema.len()] ──> model
//! MovieInput ───vectorize_input───┘
//! ```
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FeatureSchema, vectorize_dataset};
//!
//! let schema = FeatureSchema::from_records(&records);
//! let (rows, labels) = vectorize_dataset(&records, &schema);
//! ```

pub mod features;
pub mod input;
pub mod schema;

// Re-export main types
pub use features::{vectorize_dataset, vectorize_input, vectorize_record};
pub use input::MovieInput;
pub use schema::{FeatureSchema, NUMERIC_FEATURES, SCHEMA_VERSION};
