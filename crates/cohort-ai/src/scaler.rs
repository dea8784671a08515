//! Fitted feature scaling.

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A fitted numeric transform that also fixes the model's feature order.
pub trait FeatureScaler: Send + Sync {
    /// Feature names in the exact column order the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Scale a `rows × features` matrix. The output has the same shape.
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError>;
}

/// Standardization: `(x - mean) / scale`, per feature.
///
/// Either vector may be absent when the scaler was fitted without centring
/// or without scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    feature_names_in: Vec<String>,
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new(
        feature_names: Vec<String>,
        mean: Option<Vec<f64>>,
        scale: Option<Vec<f64>>,
    ) -> Result<Self, ModelError> {
        let scaler = Self {
            feature_names_in: feature_names,
            mean,
            scale,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Parse and validate the contents of `scaler.json`.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let scaler: Self =
            serde_json::from_str(json).map_err(|e| ModelError::Invalid(e.to_string()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ModelError> {
        let n = self.feature_names_in.len();
        if n == 0 {
            return Err(ModelError::Invalid("scaler has no feature names".into()));
        }

        let mut seen = HashSet::with_capacity(n);
        for name in &self.feature_names_in {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::Invalid(format!("duplicate feature name '{name}'")));
            }
        }

        if let Some(mean) = &self.mean {
            if mean.len() != n {
                return Err(ModelError::Invalid(format!(
                    "mean has {} entries for {n} features",
                    mean.len()
                )));
            }
            if mean.iter().any(|m| !m.is_finite()) {
                return Err(ModelError::Invalid("mean contains a non-finite value".into()));
            }
        }

        if let Some(scale) = &self.scale {
            if scale.len() != n {
                return Err(ModelError::Invalid(format!(
                    "scale has {} entries for {n} features",
                    scale.len()
                )));
            }
            if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                return Err(ModelError::Invalid(
                    "scale contains a zero or non-finite value".into(),
                ));
            }
        }

        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn feature_names(&self) -> &[String] {
        &self.feature_names_in
    }

    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
        let expected = self.feature_names_in.len();
        if x.ncols() != expected {
            return Err(ModelError::FeatureCount {
                expected,
                actual: x.ncols(),
            });
        }

        let mut out = x.to_owned();
        if let Some(mean) = &self.mean {
            out -= &ArrayView1::from(mean.as_slice());
        }
        if let Some(scale) = &self.scale {
            out /= &ArrayView1::from(scale.as_slice());
        }
        Ok(out)
    }
}
