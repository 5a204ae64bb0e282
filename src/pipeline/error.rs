use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The timestamp field is absent, null or cannot be parsed. Cleaning
    /// stops rather than producing a partially derived table.
    #[error("Missing required field '{field}': {reason}")]
    MissingRequiredField { field: String, reason: String },

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    pub(crate) fn missing(field: &str, reason: impl Into<String>) -> Self {
        PipelineError::MissingRequiredField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
