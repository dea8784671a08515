//! Cohort CLI: score student tables against the exported model artifacts.
//!
//! Usage:
//!   cohort predict students.csv
//!   cohort predict students.parquet --output predictions.csv --preview 10
//!   cohort --model-dir ./artifacts inspect

mod display;
mod predict;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cohort_ai::{ArtifactBundle, ArtifactPaths, DEFAULT_MODEL_DIR};

#[derive(Parser)]
#[command(name = "cohort", version)]
#[command(about = "Predict student outcomes (Dropout, Enrolled, Graduate) for a table of students")]
struct Cli {
    /// Directory holding model_rf.json, scaler.json and label_encoders.json
    #[arg(long, global = true, env = "COHORT_MODEL_DIR", default_value = DEFAULT_MODEL_DIR)]
    model_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every row of a CSV or Parquet table
    Predict {
        /// Input table (.csv, .parquet or .pq)
        input: PathBuf,

        /// Write the labelled table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of input rows to show before scoring
        #[arg(long, default_value_t = 5)]
        preview: usize,
    },
    /// Show the features, classes and encoders the model expects
    Inspect,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// The error and any context around it, each message once.
fn render_error(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::debug!("cohort v{}", env!("CARGO_PKG_VERSION"));
    let paths = ArtifactPaths::in_dir(cli.model_dir.clone());

    match cli.command {
        Command::Predict {
            input,
            output,
            preview,
        } => {
            let artifacts = ArtifactBundle::shared(&paths)?;
            let stats = predict::run_predict(artifacts, &input, preview, output.as_deref())?;
            eprintln!(
                "  Scored {}/{} rows in {:.2}s",
                stats.scored_rows, stats.total_rows, stats.elapsed_secs
            );
        }
        Command::Inspect => {
            let artifacts = ArtifactBundle::shared(&paths)?;
            display::print_inspection(&cli.model_dir, artifacts);
        }
    }

    Ok(())
}
