//! Table I/O: CSV and Parquet input, CSV output.

mod error;
pub use error::StoreError;

mod table;
pub use table::{read_csv, read_parquet, read_table, to_csv_bytes, write_csv};
