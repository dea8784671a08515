//! Categorical normalization: vocabulary filtering and integer encoding.
//!
//! For each column that has an encoder, rows whose value is missing or
//! outside the vocabulary are dropped (with a warning naming the column),
//! and surviving values are replaced by their integer codes. Dropping is
//! tracked with a keep-mask over the input rows; the input batch itself is
//! never modified.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Int64Array};
use arrow::compute::filter_record_batch;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tracing::warn;

use crate::category::column_keys;
use crate::encoder::EncoderMap;
use crate::error::PipelineError;

/// Rows removed because one column held unrecognised values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRows {
    pub column: String,
    pub rows: usize,
}

/// Output of [`normalize`].
#[derive(Debug, Clone)]
pub struct Normalized {
    /// Surviving rows, with encoded columns replaced by Int64 codes.
    pub batch: RecordBatch,
    /// One entry per input row; `true` if the row survived.
    pub keep: BooleanArray,
    /// Per-column drop counts, in encoder order.
    pub dropped: Vec<DroppedRows>,
}

/// Encode every categorical column of `input` that has an encoder.
///
/// Columns without an encoder pass through untouched. A row dropped by an
/// earlier column is not counted again by later ones.
pub fn normalize(input: &RecordBatch, encoders: &EncoderMap) -> Result<Normalized, PipelineError> {
    let n = input.num_rows();
    let schema = input.schema();

    let mut keep = vec![true; n];
    let mut dropped = Vec::new();
    let mut encoded: Vec<(usize, Vec<Option<i64>>)> = Vec::new();

    for (name, encoder) in encoders {
        let Ok(idx) = schema.index_of(name) else {
            continue;
        };

        let keys = column_keys(input.column(idx).as_ref()).map_err(|reason| {
            PipelineError::Encoding {
                column: name.clone(),
                reason,
            }
        })?;
        let codes = encoder.encode_column(&keys);

        let unknown = codes
            .iter()
            .zip(&keep)
            .filter(|(code, kept)| **kept && code.is_none())
            .count();
        if unknown > 0 {
            warn!(
                column = %name,
                rows = unknown,
                "column has unrecognised values; dropping affected rows"
            );
            for (kept, code) in keep.iter_mut().zip(&codes) {
                if code.is_none() {
                    *kept = false;
                }
            }
            dropped.push(DroppedRows {
                column: name.clone(),
                rows: unknown,
            });
        }

        encoded.push((idx, codes));
    }

    if !keep.iter().any(|&k| k) {
        return Err(PipelineError::NoValidRows);
    }

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = input.columns().to_vec();
    for (idx, codes) in encoded {
        let name = fields[idx].name().clone();
        fields[idx] = Field::new(name, DataType::Int64, true);
        columns[idx] = Arc::new(Int64Array::from(codes));
    }

    let encoded_batch = RecordBatch::try_new(
        Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone())),
        columns,
    )?;
    let keep = BooleanArray::from(keep);
    let batch = filter_record_batch(&encoded_batch, &keep)?;

    Ok(Normalized {
        batch,
        keep,
        dropped,
    })
}
