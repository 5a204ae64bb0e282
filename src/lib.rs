mod air_quality;
mod error;
mod fetch;
mod filtering;
mod frame;
mod insights;
mod pipeline;
mod types;

pub use air_quality::*;
pub use error::AirQualityError;
pub use frame::CleanedFrame;

pub use fetch::data_loader::{AirQualityLoader, RawAirQuality};
pub use fetch::error::FetchError;
pub use fetch::frame_fetcher::FrameFetcher;
pub use fetch::{DEFAULT_BASE_URL, DEFAULT_PAST_DAYS, MAX_PAST_DAYS, MIN_PAST_DAYS};

pub use pipeline::cleaner::{clean, clean_at};
pub use pipeline::error::PipelineError;
pub use pipeline::interpolate::{count_missing, interpolate_bounded};
pub use pipeline::{
    CALENDAR_DATE, DAY_OF_WEEK, DAY_OF_WEEK_RANK, HOUR_OF_DAY, MAX_INTERPOLATION_GAP,
    NON_MEASUREMENT_COLUMNS, TIME,
};

pub use insights::aggregator::{
    daily_profile, date_bounds, day_hour_matrix, default_pollutant, hourly_profile,
    pollutant_columns, Aggregator,
};
pub use insights::error::InsightError;
pub use insights::summary::{AggregateSummary, Insights, LimitStatus, RankingFacts};
pub use insights::threshold::{is_within_limit, ReferenceThresholds, Threshold};
pub use insights::MEAN;

pub use filtering::AirQualityFrameFilterExt;
pub use types::date_range::DateRange;
pub use types::day_of_week::{DayOfWeek, ParseDayOfWeekError};
pub use types::pollutant::Pollutant;
