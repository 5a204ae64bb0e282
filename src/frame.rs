//! Contains [`CleanedFrame`], the cleaned hourly table handed out by [`crate::AirQuality`].

use crate::filtering::AirQualityFrameFilterExt;
use crate::insights::aggregator::{
    daily_profile, date_bounds, day_hour_matrix, default_pollutant, hourly_profile,
    pollutant_columns,
};
use crate::insights::error::InsightError;
use crate::pipeline::CALENDAR_DATE;
use crate::types::date_range::DateRange;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoLazy};

/// A wrapper around a cleaned Polars `DataFrame`.
///
/// The frame holds a Datetime `time` column, one Float64 column per pollutant
/// (named by display label), and the derived `hour_of_day`, `calendar_date`,
/// `day_of_week` and `day_of_week_rank` columns.
///
/// Instances are typically obtained via [`crate::AirQuality::cleaned`].
#[derive(Debug, Clone)]
pub struct CleanedFrame {
    /// The underlying cleaned data.
    pub frame: DataFrame,
}

impl CleanedFrame {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows whose calendar date lies in `range`, both ends inclusive.
    ///
    /// A range that is not well formed (a bound missing, or start after end)
    /// returns the whole frame.
    pub fn get_range(&self, range: DateRange) -> Result<CleanedFrame, InsightError> {
        if self.is_empty() || range.bounds().is_none() {
            return Ok(self.clone());
        }
        if self.frame.get_column_index(CALENDAR_DATE).is_none() {
            return Err(InsightError::UnknownColumn(CALENDAR_DATE.to_string()));
        }
        let frame = self.frame.clone().lazy().filter_date_range(range).collect()?;
        Ok(CleanedFrame::new(frame))
    }

    /// Display labels of the pollutant columns, in frame order.
    pub fn pollutant_columns(&self) -> Vec<String> {
        pollutant_columns(&self.frame)
    }

    /// Column shown first by a dashboard: fine particles when present.
    pub fn default_pollutant(&self) -> Option<String> {
        default_pollutant(&self.pollutant_columns()).map(str::to_string)
    }

    /// Earliest and latest calendar date in the frame.
    pub fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, InsightError> {
        date_bounds(&self.frame)
    }

    pub fn hourly_profile(&self, column: &str) -> Result<DataFrame, InsightError> {
        hourly_profile(&self.frame, column)
    }

    pub fn daily_profile(&self, column: &str) -> Result<DataFrame, InsightError> {
        daily_profile(&self.frame, column)
    }

    pub fn day_hour_matrix(&self, column: &str) -> Result<DataFrame, InsightError> {
        day_hour_matrix(&self.frame, column)
    }
}

impl From<DataFrame> for CleanedFrame {
    fn from(frame: DataFrame) -> Self {
        CleanedFrame::new(frame)
    }
}
