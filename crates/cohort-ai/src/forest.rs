//! Random forest classifier exported from a fitted tree ensemble.
//!
//! Each tree is a flat node array where node `0` is the root. Split nodes
//! send a row left when `x[feature] <= threshold`. Leaf nodes hold per-class
//! weights (sample counts or fractions). The forest averages each tree's
//! normalized leaf distribution and predicts the class with the highest mean
//! probability; ties go to the lowest class index.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Maps a scaled feature matrix to one integer class code per row.
pub trait Classifier: Send + Sync {
    /// Number of feature columns the classifier expects.
    fn n_features(&self) -> usize;

    /// Class codes the classifier can emit.
    fn classes(&self) -> &[i64];

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: Vec<f64>) -> Self {
        Self::Leaf { value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Children must come after their parent, which rules out cycles and
    /// guarantees every walk ends at a leaf.
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid("tree has no nodes".into()));
        }

        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::Invalid(format!(
                            "node {id} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(ModelError::Invalid(format!("node {id} has a NaN threshold")));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "node {id} has invalid child {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ModelError::Invalid(format!(
                            "leaf {id} has {} class weights, model has {n_classes} classes",
                            value.len()
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(ModelError::Invalid(format!(
                            "leaf {id} has a negative or non-finite weight"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to the leaf for one row.
    fn leaf_for(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    classes: Vec<i64>,
    n_features: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(classes: Vec<i64>, n_features: usize, trees: Vec<Tree>) -> Result<Self, ModelError> {
        let forest = Self {
            classes,
            n_features,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Parse and validate the contents of `model_rf.json`.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let forest: Self =
            serde_json::from_str(json).map_err(|e| ModelError::Invalid(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("forest has no classes".into()));
        }
        if self.n_features == 0 {
            return Err(ModelError::Invalid("forest expects zero features".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| ModelError::Invalid(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probabilities for one row.
    fn proba_row(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut proba = vec![0.0f64; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_for(row);
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (p, &w) in proba.iter_mut().zip(leaf) {
                    *p += w / total;
                }
            }
        }
        let n = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n;
        }
        proba
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        if x.ncols() != self.n_features {
            return Err(ModelError::FeatureCount {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let proba = self.proba_row(row);
                self.classes[argmax(&proba)]
            })
            .collect())
    }
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
