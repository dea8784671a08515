//! Loading the pre-fitted classifier, scaler, and categorical encoders.
//!
//! The three artifacts live side by side in one directory (`model/` by
//! default). Loading is all-or-nothing: every file must exist, parse, and
//! agree on the feature count before a bundle is handed out.
//!
//! [`ArtifactBundle::shared`] caches the first successful load for the rest
//! of the process. Failed loads are not cached, so fixing a file and calling
//! again succeeds.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::info;

use crate::encoder::{EncoderMap, parse_encoders};
use crate::error::{LoadError, ModelError};
use crate::forest::{Classifier, RandomForest};
use crate::scaler::{FeatureScaler, StandardScaler};

pub const DEFAULT_MODEL_DIR: &str = "model";
pub const CLASSIFIER_FILE: &str = "model_rf.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";

static SHARED: OnceLock<ArtifactBundle> = OnceLock::new();

/// Where the three artifacts are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub classifier: String,
    pub scaler: String,
    pub encoders: String,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_MODEL_DIR)
    }
}

impl ArtifactPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            classifier: CLASSIFIER_FILE.to_string(),
            scaler: SCALER_FILE.to_string(),
            encoders: ENCODERS_FILE.to_string(),
        }
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler)
    }

    pub fn encoders_path(&self) -> PathBuf {
        self.dir.join(&self.encoders)
    }

    fn all(&self) -> [PathBuf; 3] {
        [
            self.classifier_path(),
            self.scaler_path(),
            self.encoders_path(),
        ]
    }
}

/// The fitted classifier, scaler, and encoders. Immutable once built.
pub struct ArtifactBundle {
    classifier: Box<dyn Classifier>,
    scaler: Box<dyn FeatureScaler>,
    encoders: EncoderMap,
}

impl ArtifactBundle {
    /// Assemble a bundle, checking that the classifier takes exactly the
    /// scaler's features.
    pub fn new(
        classifier: Box<dyn Classifier>,
        scaler: Box<dyn FeatureScaler>,
        encoders: EncoderMap,
    ) -> Result<Self, ModelError> {
        let expected = scaler.feature_names().len();
        if classifier.n_features() != expected {
            return Err(ModelError::FeatureCount {
                expected,
                actual: classifier.n_features(),
            });
        }
        Ok(Self {
            classifier,
            scaler,
            encoders,
        })
    }

    /// Read and validate all three artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, LoadError> {
        let missing: Vec<PathBuf> = paths.all().into_iter().filter(|p| !p.exists()).collect();
        if !missing.is_empty() {
            return Err(LoadError::ArtifactsMissing(missing));
        }

        let classifier_path = paths.classifier_path();
        let classifier = RandomForest::from_json(&read_artifact(&classifier_path)?)
            .map_err(|e| LoadError::corrupt(&classifier_path, e))?;

        let scaler_path = paths.scaler_path();
        let scaler = StandardScaler::from_json(&read_artifact(&scaler_path)?)
            .map_err(|e| LoadError::corrupt(&scaler_path, e))?;

        let encoders_path = paths.encoders_path();
        let encoders = parse_encoders(&read_artifact(&encoders_path)?)
            .map_err(|e| LoadError::corrupt(&encoders_path, e))?;

        let trees = classifier.n_trees();
        let bundle = Self::new(Box::new(classifier), Box::new(scaler), encoders).map_err(|e| {
            LoadError::corrupt(
                &classifier_path,
                format!("classifier does not match scaler: {e}"),
            )
        })?;

        info!(
            dir = %paths.dir.display(),
            features = bundle.feature_names().len(),
            encoders = bundle.encoders.len(),
            trees,
            "loaded model artifacts"
        );
        Ok(bundle)
    }

    /// Process-wide bundle, loaded on first success and reused afterwards.
    ///
    /// Later calls return the same bundle regardless of `paths`.
    pub fn shared(paths: &ArtifactPaths) -> Result<&'static ArtifactBundle, LoadError> {
        if let Some(bundle) = SHARED.get() {
            return Ok(bundle);
        }
        let bundle = Self::load(paths)?;
        Ok(SHARED.get_or_init(|| bundle))
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn encoders(&self) -> &EncoderMap {
        &self.encoders
    }

    /// Required input columns, in model order.
    pub fn feature_names(&self) -> &[String] {
        self.scaler.feature_names()
    }
}

impl fmt::Debug for ArtifactBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactBundle")
            .field("features", &self.feature_names())
            .field("classes", &self.classifier.classes())
            .field("encoders", &self.encoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn read_artifact(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::corrupt(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, ConstantClassifier};
    use std::fs;
    use tempfile::TempDir;

    const FOREST: &str = r#"{
        "classes": [0, 1, 2],
        "n_features": 2,
        "trees": [{
            "nodes": [
                {"feature": 1, "threshold": 2.5, "left": 1, "right": 2},
                {"value": [1.0, 0.0, 0.0]},
                {"value": [0.0, 0.0, 1.0]}
            ]
        }]
    }"#;

    const SCALER: &str = r#"{
        "feature_names_in": ["dept", "gpa"],
        "mean": [0.0, 0.0],
        "scale": [1.0, 1.0]
    }"#;

    const ENCODERS: &str = r#"{"dept": {"classes": ["A", "B", "C"]}}"#;

    fn write_artifacts(dir: &Path, forest: &str, scaler: &str, encoders: &str) {
        fs::write(dir.join(CLASSIFIER_FILE), forest).unwrap();
        fs::write(dir.join(SCALER_FILE), scaler).unwrap();
        fs::write(dir.join(ENCODERS_FILE), encoders).unwrap();
    }

    fn demo_model_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("demos")
            .join("model")
    }

    #[test]
    fn default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.classifier_path(), Path::new("model/model_rf.json"));
        assert_eq!(paths.scaler_path(), Path::new("model/scaler.json"));
        assert_eq!(paths.encoders_path(), Path::new("model/label_encoders.json"));
    }

    #[test]
    fn loads_valid_artifacts() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path(), FOREST, SCALER, ENCODERS);

        let bundle = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap();
        assert_eq!(bundle.feature_names(), &["dept", "gpa"]);
        assert_eq!(bundle.classifier().classes(), &[0, 1, 2]);
        assert_eq!(bundle.encoders()["dept"].len(), 3);
    }

    #[test]
    fn missing_files_are_all_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SCALER_FILE), SCALER).unwrap();

        let err = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap_err();
        match err {
            LoadError::ArtifactsMissing(paths) => {
                assert_eq!(paths.len(), 2);
                assert!(paths[0].ends_with(CLASSIFIER_FILE));
                assert!(paths[1].ends_with(ENCODERS_FILE));
            }
            other => panic!("expected ArtifactsMissing, got {other}"),
        }
    }

    #[test]
    fn unparseable_file_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path(), FOREST, "{ not json", ENCODERS);

        let err = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap_err();
        match err {
            LoadError::ArtifactsCorrupt { path, .. } => assert!(path.ends_with(SCALER_FILE)),
            other => panic!("expected ArtifactsCorrupt, got {other}"),
        }
    }

    #[test]
    fn scaler_without_feature_names_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path(), FOREST, r#"{"mean": [0.0, 0.0]}"#, ENCODERS);

        let err = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap_err();
        assert!(matches!(err, LoadError::ArtifactsCorrupt { .. }));
    }

    #[test]
    fn malformed_encoder_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(
            tmp.path(),
            FOREST,
            SCALER,
            r#"{"dept": {"classes": ["A", "A"]}}"#,
        );

        let err = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap_err();
        match err {
            LoadError::ArtifactsCorrupt { path, reason } => {
                assert!(path.ends_with(ENCODERS_FILE));
                assert!(reason.contains("dept"), "got: {reason}");
            }
            other => panic!("expected ArtifactsCorrupt, got {other}"),
        }
    }

    #[test]
    fn feature_count_mismatch_is_corrupt() {
        let tmp = TempDir::new().unwrap();
        let one_feature = r#"{"feature_names_in": ["gpa"]}"#;
        write_artifacts(tmp.path(), FOREST, one_feature, ENCODERS);

        let err = ArtifactBundle::load(&ArtifactPaths::in_dir(tmp.path())).unwrap_err();
        match err {
            LoadError::ArtifactsCorrupt { path, reason } => {
                assert!(path.ends_with(CLASSIFIER_FILE));
                assert!(reason.contains("does not match scaler"), "got: {reason}");
            }
            other => panic!("expected ArtifactsCorrupt, got {other}"),
        }
    }

    #[test]
    fn new_checks_feature_count() {
        let scaler = testing::identity_scaler(&["gpa", "credits"]);
        let classifier = ConstantClassifier::new(3, 2);
        let err = ArtifactBundle::new(Box::new(classifier), Box::new(scaler), EncoderMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureCount {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn shared_returns_same_bundle() {
        let first = ArtifactBundle::shared(&ArtifactPaths::in_dir(demo_model_dir())).unwrap();
        // A bogus directory is ignored once the bundle is cached.
        let second = ArtifactBundle::shared(&ArtifactPaths::in_dir("/nonexistent")).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
