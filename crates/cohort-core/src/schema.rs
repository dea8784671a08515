//! Arrow schema pieces shared by the pipeline and its callers.

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use crate::status::StudentStatus;

/// Name of the label column appended to a scored table.
pub const PREDICTION_COLUMN: &str = "Predicted Status";

/// Field definition for the appended label column.
pub fn prediction_field() -> Field {
    Field::new(PREDICTION_COLUMN, DataType::Utf8, false)
}

/// Append the label column to `batch`.
///
/// `labels` must hold exactly one entry per row of `batch`.
pub fn with_prediction_column(
    batch: &RecordBatch,
    labels: &[StudentStatus],
) -> Result<RecordBatch, ArrowError> {
    if labels.len() != batch.num_rows() {
        return Err(ArrowError::InvalidArgumentError(format!(
            "{} labels for {} rows",
            labels.len(),
            batch.num_rows()
        )));
    }

    let mut fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(prediction_field());

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(StringArray::from_iter_values(
        labels.iter().map(|s| s.as_str()),
    )));

    RecordBatch::try_new(
        Arc::new(Schema::new_with_metadata(
            fields,
            batch.schema().metadata().clone(),
        )),
        columns,
    )
}
