use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to bring up the artifact bundle. Fatal until the files are fixed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model artifacts not found: {}", join_paths(.0))]
    ArtifactsMissing(Vec<PathBuf>),

    #[error("failed to load model artifact {}: {}", .path.display(), .reason)]
    ArtifactsCorrupt { path: PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn corrupt(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::ArtifactsCorrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Failure scoring one batch. The batch produces no labels.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to encode column '{column}': {reason}")]
    Encoding { column: String, reason: String },

    #[error("no valid rows left to predict after removing unrecognised values")]
    NoValidRows,

    #[error("input columns do not match the model; missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error(transparent)]
    Table(#[from] arrow::error::ArrowError),
}

/// Structural problem with a scaler or classifier, or a matrix it cannot take.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("invalid model: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("encoder has no classes")]
    Empty,

    #[error("duplicate class {0:?}")]
    DuplicateClass(String),

    #[error("unsupported class value {0} (expected string or number)")]
    UnsupportedValue(String),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
