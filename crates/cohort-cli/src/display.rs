//! Terminal output for the predict and inspect commands.
//!
//! Tables go to stdout via Arrow's pretty printer; warnings and progress go
//! to stderr so stdout can be piped.

use std::fmt::Write as _;
use std::path::Path;

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use cohort_ai::{ArtifactBundle, LabelEncoder};
use cohort_core::StudentStatus;

const MAX_LIST_ITEMS: usize = 10;

// ── Predict ──

/// Print the first `n` rows of the input table.
pub fn print_preview(batch: &RecordBatch, n: usize) -> anyhow::Result<()> {
    let shown = n.min(batch.num_rows());
    println!("Input preview ({shown} of {} rows)", batch.num_rows());
    println!("{}", pretty_format_batches(&[batch.slice(0, shown)])?);
    println!();
    Ok(())
}

/// Per-status tally, plus the number of input rows that were not scored.
pub fn print_summary(counts: &[(StudentStatus, usize)], dropped: usize) {
    print!("{}", format_summary(counts, dropped));
}

fn format_summary(counts: &[(StudentStatus, usize)], dropped: usize) -> String {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let mut out = String::from("\nPrediction summary\n");
    for (status, n) in counts {
        // Unknown only shows up when the classifier emitted an unmapped code.
        if *status == StudentStatus::Unknown && *n == 0 {
            continue;
        }
        let pct = if total == 0 {
            0.0
        } else {
            *n as f64 / total as f64 * 100.0
        };
        let _ = writeln!(out, "  {:<26} {:>6}  ({pct:.1}%)", status.as_str(), n);
    }
    let _ = writeln!(out, "  {:<26} {:>6}", "Total", total);
    if dropped > 0 {
        let _ = writeln!(out, "  {:<26} {:>6}", "Dropped (unrecognised)", dropped);
    }
    out
}

// ── Inspect ──

/// Print what the loaded artifacts expect from an input table.
pub fn print_inspection(dir: &Path, artifacts: &ArtifactBundle) {
    print!("{}", format_inspection(dir, artifacts));
}

fn format_inspection(dir: &Path, artifacts: &ArtifactBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Model artifacts: {} ===", dir.display());
    let _ = writeln!(out);

    let features = artifacts.feature_names();
    let _ = writeln!(out, "Features ({}), in model order", features.len());
    for (i, name) in features.iter().enumerate() {
        let kind = if artifacts.encoders().contains_key(name) {
            "categorical"
        } else {
            "numeric"
        };
        let _ = writeln!(out, "  {:>3}  {:<26} {}", i, name, kind);
    }
    let _ = writeln!(out);

    let classes: Vec<String> = artifacts
        .classifier()
        .classes()
        .iter()
        .map(|&code| format!("{code} → {}", StudentStatus::from_code(code)))
        .collect();
    let _ = writeln!(out, "Classes");
    let _ = writeln!(out, "  {}", classes.join(", "));
    let _ = writeln!(out);

    let _ = writeln!(out, "Encoders ({})", artifacts.encoders().len());
    for (column, encoder) in artifacts.encoders() {
        let _ = writeln!(
            out,
            "  {:<26} {} values: {}",
            column,
            encoder.len(),
            vocabulary(encoder)
        );
    }
    out
}

fn vocabulary(encoder: &LabelEncoder) -> String {
    let classes = encoder.classes();
    let shown: Vec<&str> = classes
        .iter()
        .take(MAX_LIST_ITEMS)
        .map(|c| c.as_str())
        .collect();
    let mut s = shown.join(", ");
    if classes.len() > MAX_LIST_ITEMS {
        let _ = write!(s, ", ... and {} more", classes.len() - MAX_LIST_ITEMS);
    }
    s
}
