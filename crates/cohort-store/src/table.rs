//! Reading student tables into a single Arrow `RecordBatch` and writing
//! scored tables back out.
//!
//! CSV schemas are inferred from the data: numeric-looking columns become
//! Int64/Float64, everything else Utf8. Empty fields are nulls.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::info;

use crate::StoreError;

/// Read a table from disk, dispatching on the file extension.
///
/// Supported formats:
/// * `.csv` – header row, schema inferred from the rows
/// * `.parquet` / `.pq`
pub fn read_table(path: &Path) -> Result<RecordBatch, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (schema, batches) = match ext.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(StoreError::UnsupportedFormat(other.to_string())),
    };

    let batch = concat_batches(&schema, &batches)?;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        path = %path.display(),
        "read input table"
    );
    Ok(batch)
}

/// Read a CSV file with a header row, inferring the schema from every row.
pub fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StoreError> {
    let mut file = File::open(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok((schema, batches?))
}

pub fn read_parquet(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>), StoreError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches: Result<Vec<RecordBatch>, _> = reader.collect();
    Ok((schema, batches?))
}

/// Write a table as CSV with a header row.
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<(), StoreError> {
    std::fs::write(path, to_csv_bytes(batch)?)?;
    info!(rows = batch.num_rows(), path = %path.display(), "wrote csv");
    Ok(())
}

/// Serialize a table as UTF-8 CSV bytes, header included.
pub fn to_csv_bytes(batch: &RecordBatch) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new().with_header(true).build(&mut buf);
        writer.write(batch)?;
    }
    Ok(buf)
}
