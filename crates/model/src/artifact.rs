//! Trained model persistence.
//!
//! A [`ModelArtifact`] bundles the decision tree with the feature
//! schema it was trained against, so the serving side can rebuild
//! byte-identical feature rows without access to the training CSV.
//! The bundle is written with bincode and tagged with a format
//! version, checked before anything else on load.

use crate::error::{ModelError, Result};
use crate::explain::{explain, Explanation};
use crate::tree::DecisionTree;
use pipeline::{vectorize_input, FeatureSchema, MovieInput};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Current artifact format version
pub const ARTIFACT_VERSION: u16 = 1;

/// A trained tree plus the schema that produced its feature rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    // Version stays the first field so readers can reject a foreign
    // format before touching the rest of the payload.
    version: u16,
    schema: FeatureSchema,
    tree: DecisionTree,
}

impl ModelArtifact {
    /// Bundle a tree with its schema, checking that they agree on the
    /// feature width
    pub fn new(schema: FeatureSchema, tree: DecisionTree) -> Result<Self> {
        if schema.len() != tree.n_features() {
            return Err(ModelError::SchemaMismatch {
                schema: schema.len(),
                tree: tree.n_features(),
            });
        }
        Ok(Self {
            version: ARTIFACT_VERSION,
            schema,
            tree,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Serialize to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    /// Load an artifact from disk, rejecting unknown versions and
    /// schema/tree disagreements
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }

        let bytes = fs::read(path)?;
        let artifact: ModelArtifact = bincode::deserialize(&bytes)?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(ModelError::UnsupportedVersion(artifact.version));
        }
        if artifact.schema.len() != artifact.tree.n_features() {
            return Err(ModelError::SchemaMismatch {
                schema: artifact.schema.len(),
                tree: artifact.tree.n_features(),
            });
        }

        info!(
            "Loaded model artifact from {} ({} features, depth {})",
            path.display(),
            artifact.tree.n_features(),
            artifact.tree.depth()
        );
        Ok(artifact)
    }

    /// Vectorize a submitted movie with the bundled schema and explain
    /// the resulting prediction
    pub fn explain_input(&self, input: &MovieInput) -> Result<Explanation> {
        let row = vectorize_input(input, &self.schema);
        explain(&self.tree, &self.schema, &row)
    }
}
