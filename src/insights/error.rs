use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    /// Aggregates and ranking facts are undefined without rows. Check for an
    /// empty selection and show a "no data" state instead.
    #[error("No readings in the selected range, nothing to aggregate")]
    EmptySelection,

    #[error("Column '{0}' not found in cleaned frame")]
    UnknownColumn(String),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
