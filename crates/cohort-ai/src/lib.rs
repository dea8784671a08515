//! Student outcome inference: artifact loading, categorical normalization,
//! feature alignment, and random-forest scoring over Arrow tables.

mod align;
mod artifacts;
mod category;
mod encoder;
mod error;
mod forest;
mod inference;
mod normalize;
mod pipeline;
mod scaler;
#[cfg(test)]
mod testing;

pub use align::align;
pub use artifacts::{
    ArtifactBundle, ArtifactPaths, CLASSIFIER_FILE, DEFAULT_MODEL_DIR, ENCODERS_FILE, SCALER_FILE,
};
pub use category::CategoryKey;
pub use encoder::{EncoderArtifact, EncoderMap, LabelEncoder};
pub use error::{EncoderError, LoadError, ModelError, PipelineError};
pub use forest::{Classifier, Node, RandomForest, Tree};
pub use inference::{feature_matrix, run_inference};
pub use normalize::{DroppedRows, Normalized, normalize};
pub use pipeline::{Prediction, predict_batch};
pub use scaler::{FeatureScaler, StandardScaler};
