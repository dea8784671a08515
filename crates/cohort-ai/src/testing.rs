//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use ndarray::ArrayView2;

use crate::artifacts::ArtifactBundle;
use crate::category::CategoryKey;
use crate::encoder::{EncoderMap, LabelEncoder};
use crate::error::ModelError;
use crate::forest::{Classifier, Node, RandomForest, Tree};
use crate::scaler::StandardScaler;

/// Emits the same code for every row and counts `predict` calls.
pub struct ConstantClassifier {
    n_features: usize,
    code: i64,
    classes: Vec<i64>,
    calls: AtomicUsize,
}

impl ConstantClassifier {
    pub fn new(n_features: usize, code: i64) -> Self {
        Self {
            n_features,
            code,
            classes: vec![code],
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Classifier for ConstantClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.code; x.nrows()])
    }
}

/// Forwards to a shared [`ConstantClassifier`] so a test can keep a handle
/// on the call counter after the bundle takes ownership.
pub struct SharedClassifier(pub Arc<ConstantClassifier>);

impl Classifier for SharedClassifier {
    fn n_features(&self) -> usize {
        self.0.n_features()
    }

    fn classes(&self) -> &[i64] {
        self.0.classes()
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        self.0.predict(x)
    }
}

pub fn identity_scaler(features: &[&str]) -> StandardScaler {
    StandardScaler::new(features.iter().map(|s| s.to_string()).collect(), None, None).unwrap()
}

pub fn encoders(columns: &[(&str, &[&str])]) -> EncoderMap {
    columns
        .iter()
        .map(|(name, classes)| {
            let keys = classes.iter().map(|c| CategoryKey::text(*c)).collect();
            (name.to_string(), LabelEncoder::new(keys).unwrap())
        })
        .collect()
}

/// Two-column table: nullable `dept` (Utf8) and `gpa` (Float64).
pub fn student_batch(depts: &[Option<&str>], gpas: &[f64]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("dept", DataType::Utf8, true),
        Field::new("gpa", DataType::Float64, false),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(depts.to_vec())),
            Arc::new(Float64Array::from(gpas.to_vec())),
        ],
    )
    .unwrap()
}

/// Features `[dept, gpa]`, `dept` vocabulary `{A, B, C}`, unit scaling.
///
/// gpa <= 2.5 → Dropout; otherwise dept A → Graduate, B/C → Enrolled.
pub fn student_bundle() -> ArtifactBundle {
    let tree = Tree::new(vec![
        Node::split(1, 2.5, 1, 2),
        Node::leaf(vec![5.0, 0.0, 0.0]),
        Node::split(0, 0.5, 3, 4),
        Node::leaf(vec![0.0, 1.0, 4.0]),
        Node::leaf(vec![0.0, 3.0, 1.0]),
    ]);
    let forest = RandomForest::new(vec![0, 1, 2], 2, vec![tree]).unwrap();
    let scaler = StandardScaler::new(
        vec!["dept".into(), "gpa".into()],
        Some(vec![0.0, 0.0]),
        Some(vec![1.0, 1.0]),
    )
    .unwrap();

    ArtifactBundle::new(
        Box::new(forest),
        Box::new(scaler),
        encoders(&[("dept", &["A", "B", "C"])]),
    )
    .unwrap()
}
