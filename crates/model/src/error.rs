//! Error types for training, evaluation, and artifact handling.

use thiserror::Error;

/// Errors that can occur while training or using a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("feature width mismatch: model expects {expected} features, got {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("schema and tree disagree: schema describes {schema} features, tree was trained on {tree}")]
    SchemaMismatch { schema: usize, tree: usize },

    #[error("cannot train on an empty dataset")]
    EmptyTrainingSet,

    #[error("rows and labels differ in length: {rows} rows vs {labels} labels")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("labels must be 0 or 1, got {0}")]
    InvalidLabel(u8),

    #[error("test fraction must lie strictly between 0 and 1, got {0}")]
    InvalidFraction(f64),

    #[error("cannot compute metrics over an empty prediction set")]
    EmptyEvaluation,

    #[error("model artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("unsupported model artifact version: {0}")]
    UnsupportedVersion(u16),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("artifact serialization failed: {0}")]
    SerializationError(#[from] bincode::Error),
}

/// Result type alias used throughout the model crate
pub type Result<T> = std::result::Result<T, ModelError>;
