//! Prediction command: read a table, score it, print and optionally save the labels.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::util::pretty::pretty_format_batches;
use cohort_ai::{ArtifactBundle, predict_batch};

use crate::display;

#[derive(Debug)]
pub struct PredictStats {
    pub total_rows: usize,
    pub scored_rows: usize,
    pub elapsed_secs: f64,
}

/// Run the full prediction flow: read table → preview → score → print → save.
///
/// A pipeline failure is returned unwrapped so its message reaches the user
/// as-is, and nothing is printed or written for the batch.
pub fn run_predict(
    artifacts: &ArtifactBundle,
    input: &Path,
    preview: usize,
    output: Option<&Path>,
) -> anyhow::Result<PredictStats> {
    let start = Instant::now();

    // 1. Read the input table.
    let batch = cohort_store::read_table(input)?;
    let total_rows = batch.num_rows();
    eprintln!("  Read {total_rows} rows from {}", input.display());

    // 2. Show the head of the input.
    if preview > 0 {
        display::print_preview(&batch, preview)?;
    }

    // 3. Score.
    // Per-column drop warnings are logged by the pipeline itself.
    let prediction = predict_batch(artifacts, &batch)?;

    // 4. Labelled table and summary.
    let labelled = prediction
        .labelled(&batch)
        .context("attaching predictions to input rows")?;
    println!("{}", pretty_format_batches(std::slice::from_ref(&labelled))?);
    display::print_summary(&prediction.counts(), total_rows - prediction.len());

    // 5. Save.
    if let Some(path) = output {
        cohort_store::write_csv(&labelled, path)
            .with_context(|| format!("writing {}", path.display()))?;
        eprintln!("  Wrote {} rows to {}", labelled.num_rows(), path.display());
    }

    Ok(PredictStats {
        total_rows,
        scored_rows: prediction.len(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
