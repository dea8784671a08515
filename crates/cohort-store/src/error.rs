use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table file not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("unsupported table format: .{0} (expected .csv or .parquet)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_print_their_source_once() {
        let err = StoreError::from(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert!(std::error::Error::source(&err).is_none());
    }
}
