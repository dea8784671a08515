//! Batch orchestration: normalize → align → infer → label.
//!
//! The first failing stage ends the batch with a single [`PipelineError`]
//! and no labels. On success the [`Prediction`] carries one label per
//! surviving row plus the keep-mask needed to line those labels up with the
//! caller's original rows.

use arrow::array::BooleanArray;
use arrow::compute::filter_record_batch;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use cohort_core::schema::with_prediction_column;
use cohort_core::{StudentStatus, label_codes};
use tracing::info;

use crate::align::align;
use crate::artifacts::ArtifactBundle;
use crate::error::PipelineError;
use crate::inference::run_inference;
use crate::normalize::{DroppedRows, normalize};

/// Labels for the rows of one batch that survived normalization.
#[derive(Debug, Clone)]
pub struct Prediction {
    labels: Vec<StudentStatus>,
    keep: BooleanArray,
    dropped: Vec<DroppedRows>,
}

impl Prediction {
    /// One label per surviving row, in input order.
    pub fn labels(&self) -> &[StudentStatus] {
        &self.labels
    }

    /// One entry per input row; `true` where the row was scored.
    pub fn keep_mask(&self) -> &BooleanArray {
        &self.keep
    }

    /// Columns that caused rows to be dropped, and how many.
    pub fn dropped(&self) -> &[DroppedRows] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The rows of `input` that were scored, in order.
    ///
    /// `input` must be the batch passed to [`predict_batch`].
    pub fn surviving_rows(&self, input: &RecordBatch) -> Result<RecordBatch, PipelineError> {
        if input.num_rows() != self.keep.len() {
            return Err(ArrowError::InvalidArgumentError(format!(
                "prediction covers {} rows, table has {}",
                self.keep.len(),
                input.num_rows()
            ))
            .into());
        }
        Ok(filter_record_batch(input, &self.keep)?)
    }

    /// Surviving rows of `input` with the label column appended.
    pub fn labelled(&self, input: &RecordBatch) -> Result<RecordBatch, PipelineError> {
        let rows = self.surviving_rows(input)?;
        Ok(with_prediction_column(&rows, &self.labels)?)
    }

    /// Label tally in [`StudentStatus::ALL`] order.
    pub fn counts(&self) -> Vec<(StudentStatus, usize)> {
        StudentStatus::ALL
            .iter()
            .map(|&status| {
                let n = self.labels.iter().filter(|&&l| l == status).count();
                (status, n)
            })
            .collect()
    }
}

/// Score every valid row of `input` against the artifact bundle.
pub fn predict_batch(
    artifacts: &ArtifactBundle,
    input: &RecordBatch,
) -> Result<Prediction, PipelineError> {
    let normalized = normalize(input, artifacts.encoders())?;
    let aligned = align(&normalized.batch, artifacts.feature_names())?;
    let codes = run_inference(&aligned, artifacts.scaler(), artifacts.classifier())?;
    let labels = label_codes(&codes);

    info!(
        input_rows = input.num_rows(),
        scored_rows = labels.len(),
        dropped_rows = input.num_rows() - labels.len(),
        "scored batch"
    );

    Ok(Prediction {
        labels,
        keep: normalized.keep,
        dropped: normalized.dropped,
    })
}
