//! Fitted label encoders for categorical columns.
//!
//! An encoder's vocabulary is its ordered class list; a value's code is its
//! position in that list, as with a label encoder fitted at training time.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::CategoryKey;
use crate::error::EncoderError;

/// On-disk form of one encoder in `label_encoders.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub classes: Vec<Value>,
}

/// Categorical column name → encoder, iterated in name order.
pub type EncoderMap = BTreeMap<String, LabelEncoder>;

#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<CategoryKey>,
    codes: HashMap<CategoryKey, i64>,
}

impl LabelEncoder {
    /// Build an encoder from its class list. Duplicates would break the
    /// value ↔ code bijection and are rejected.
    pub fn new(classes: Vec<CategoryKey>) -> Result<Self, EncoderError> {
        if classes.is_empty() {
            return Err(EncoderError::Empty);
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code as i64).is_some() {
                return Err(EncoderError::DuplicateClass(class.to_string()));
            }
        }

        Ok(Self { classes, codes })
    }

    pub fn from_artifact(artifact: &EncoderArtifact) -> Result<Self, EncoderError> {
        let classes = artifact
            .classes
            .iter()
            .map(|v| {
                CategoryKey::from_json(v).ok_or_else(|| EncoderError::UnsupportedValue(v.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(classes)
    }

    /// Integer code for a known value, `None` if outside the vocabulary.
    pub fn encode(&self, key: &CategoryKey) -> Option<i64> {
        self.codes.get(key).copied()
    }

    /// Encode a column of keys; missing and unknown cells yield `None`.
    pub fn encode_column(&self, keys: &[Option<CategoryKey>]) -> Vec<Option<i64>> {
        keys.iter()
            .map(|k| k.as_ref().and_then(|k| self.encode(k)))
            .collect()
    }

    pub fn classes(&self) -> &[CategoryKey] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Parse the contents of `label_encoders.json`.
pub fn parse_encoders(json: &str) -> Result<EncoderMap, String> {
    let artifacts: BTreeMap<String, EncoderArtifact> =
        serde_json::from_str(json).map_err(|e| e.to_string())?;

    artifacts
        .into_iter()
        .map(|(column, artifact)| {
            LabelEncoder::from_artifact(&artifact)
                .map(|enc| (column.clone(), enc))
                .map_err(|e| format!("column '{column}': {e}"))
        })
        .collect()
}
