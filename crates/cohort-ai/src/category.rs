//! Canonical keys for categorical cells.
//!
//! Encoder vocabularies come from JSON (strings or numbers) while input
//! cells come from Arrow columns of whatever type the reader inferred. Both
//! sides are reduced to the same text key before lookup:
//!
//! - strings are kept verbatim
//! - integers, and floats with no fractional part, become integer text
//!   (`1`, `1.0` and `"1"` all match)
//! - other floats use their shortest round-trip text
//! - boolean cells become `true` / `false`, matched by string classes
//! - dates and timestamps use Arrow's text form (`2021-09-01`)
//! - nulls and NaN have no key and are always unknown

use std::fmt;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use serde_json::Value;

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn text(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn integer(v: i64) -> Self {
        Self(v.to_string())
    }

    /// `None` for NaN, which counts as a missing cell.
    pub fn float(v: f64) -> Option<Self> {
        if v.is_nan() {
            return None;
        }
        if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
            return Some(Self::integer(v as i64));
        }
        Some(Self(v.to_string()))
    }

    pub fn boolean(v: bool) -> Self {
        Self::text(if v { "true" } else { "false" })
    }

    /// Key for a vocabulary entry from an encoder artifact. Only strings and
    /// numbers are accepted.
    pub fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(Self::text(s.as_str())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64().and_then(Self::float)
                }
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract one key per row of an Arrow column; `None` marks a missing cell.
///
/// Types without a dedicated rule (dates, timestamps, decimals) are keyed
/// by their text form. Nested types (lists, structs) are an error.
pub fn column_keys(col: &dyn Array) -> Result<Vec<Option<CategoryKey>>, String> {
    let keys = match col.data_type() {
        DataType::Null => vec![None; col.len()],
        DataType::Utf8 => col
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(CategoryKey::text))
            .collect(),
        DataType::LargeUtf8 => col
            .as_string::<i64>()
            .iter()
            .map(|v| v.map(CategoryKey::text))
            .collect(),
        DataType::Utf8View => col
            .as_string_view()
            .iter()
            .map(|v| v.map(CategoryKey::text))
            .collect(),
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map(CategoryKey::boolean))
            .collect(),
        dt if dt.is_integer() => {
            // Values outside i64 come back null and are treated as unknown.
            let ints = cast(col, &DataType::Int64).map_err(|e| e.to_string())?;
            ints.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map(CategoryKey::integer))
                .collect()
        }
        dt if dt.is_floating() => {
            let floats = cast(col, &DataType::Float64).map_err(|e| e.to_string())?;
            floats
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.and_then(CategoryKey::float))
                .collect()
        }
        other if other.is_nested() => return Err(format!("unsupported column type {other}")),
        // Dates, timestamps, decimals: match on their text form.
        _ => {
            let text = cast(col, &DataType::Utf8)
                .map_err(|e| format!("cannot read {} column as text: {e}", col.data_type()))?;
            text.as_string::<i32>()
                .iter()
                .map(|v| v.map(CategoryKey::text))
                .collect()
        }
    };
    Ok(keys)
}
