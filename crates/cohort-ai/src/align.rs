//! Feature alignment: select the model's columns in the model's order.

use arrow::record_batch::RecordBatch;

use crate::error::PipelineError;

/// Project `batch` onto `features`, in that order.
///
/// Every missing feature is reported at once. Columns not in `features`
/// are dropped.
pub fn align(batch: &RecordBatch, features: &[String]) -> Result<RecordBatch, PipelineError> {
    let schema = batch.schema();

    let mut indices = Vec::with_capacity(features.len());
    let mut missing = Vec::new();
    for name in features {
        match schema.index_of(name) {
            Ok(i) => indices.push(i),
            Err(_) => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    Ok(batch.project(&indices)?)
}
