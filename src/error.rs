use crate::fetch::error::FetchError;
use crate::insights::error::InsightError;
use crate::pipeline::error::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirQualityError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Insight(#[from] InsightError),
}
