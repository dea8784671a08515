//! Scaling and classification of an aligned feature table.

use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use ndarray::Array2;

use crate::error::PipelineError;
use crate::forest::Classifier;
use crate::scaler::FeatureScaler;

/// Convert every column of `batch` to f64 into a `rows × columns` matrix.
///
/// Fails on the first missing or non-numeric cell; NaN and infinities count
/// as non-numeric.
pub fn feature_matrix(batch: &RecordBatch) -> Result<Array2<f64>, PipelineError> {
    let schema = batch.schema();
    let mut x = Array2::<f64>::zeros((batch.num_rows(), batch.num_columns()));

    for (j, (field, col)) in schema.fields().iter().zip(batch.columns()).enumerate() {
        let values = cast(col, &DataType::Float64).map_err(|e| {
            PipelineError::Inference(format!("column '{}' is not numeric: {e}", field.name()))
        })?;
        let values = values.as_primitive::<Float64Type>();

        for (i, v) in values.iter().enumerate() {
            match v {
                Some(v) if v.is_finite() => x[[i, j]] = v,
                _ => {
                    return Err(PipelineError::Inference(format!(
                        "column '{}' has a missing or non-numeric value at row {i}",
                        field.name()
                    )));
                }
            }
        }
    }

    Ok(x)
}

/// Scale the aligned table and classify each row.
///
/// Produces exactly one class code per input row.
pub fn run_inference(
    batch: &RecordBatch,
    scaler: &dyn FeatureScaler,
    classifier: &dyn Classifier,
) -> Result<Vec<i64>, PipelineError> {
    let x = feature_matrix(batch)?;

    let scaled = scaler
        .transform(x.view())
        .map_err(|e| PipelineError::Inference(format!("scaler: {e}")))?;
    if scaled.dim() != x.dim() {
        return Err(PipelineError::Inference(format!(
            "scaler changed matrix shape from {:?} to {:?}",
            x.dim(),
            scaled.dim()
        )));
    }

    let codes = classifier
        .predict(scaled.view())
        .map_err(|e| PipelineError::Inference(format!("classifier: {e}")))?;
    if codes.len() != x.nrows() {
        return Err(PipelineError::Inference(format!(
            "classifier returned {} predictions for {} rows",
            codes.len(),
            x.nrows()
        )));
    }

    Ok(codes)
}
