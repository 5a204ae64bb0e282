//! Aggregations over a cleaned frame: date selection, KPI values, threshold
//! classification, and the grouped means behind the ranking facts and charts.

use crate::filtering::AirQualityFrameFilterExt;
use crate::insights::error::InsightError;
use crate::insights::summary::{AggregateSummary, Insights, RankingFacts};
use crate::insights::threshold::{is_within_limit, ReferenceThresholds};
use crate::insights::MEAN;
use crate::pipeline::{
    CALENDAR_DATE, DAY_OF_WEEK, DAY_OF_WEEK_RANK, HOUR_OF_DAY, NON_MEASUREMENT_COLUMNS, TIME,
};
use crate::types::date_range::DateRange;
use crate::types::day_of_week::DayOfWeek;
use crate::types::pollutant::Pollutant;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

/// Computes the KPI and insight values for a selected column and date range.
///
/// The aggregator owns its [`ReferenceThresholds`]; every other input is
/// passed per call, so one instance can serve any number of independent
/// requests.
///
/// # Example
///
/// ```
/// use air_quality::{Aggregator, DateRange};
/// use chrono::NaiveDate;
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let cleaned = df!(
///     "time" => [day.and_hms_opt(0, 0, 0).unwrap(), day.and_hms_opt(1, 0, 0).unwrap()],
///     "NO2" => [10.0, 30.0],
///     "hour_of_day" => [0u32, 1],
///     "calendar_date" => [day, day],
///     "day_of_week" => ["Monday", "Monday"],
///     "day_of_week_rank" => [0u32, 0],
/// )?;
///
/// let aggregator = Aggregator::default();
/// let selected = aggregator.select(&cleaned, DateRange::between(day, day))?;
/// let summary = aggregator.summarize(&selected, "NO2")?;
/// assert_eq!(summary.latest_value, Some(30.0));
/// assert!(!summary.is_within_limit);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    thresholds: ReferenceThresholds,
}

impl Aggregator {
    pub fn new(thresholds: ReferenceThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ReferenceThresholds {
        &self.thresholds
    }

    /// Rows whose `calendar_date` lies in `range` (inclusive). A range that is
    /// not well formed selects the whole frame.
    pub fn select(&self, cleaned: &DataFrame, range: DateRange) -> Result<DataFrame, InsightError> {
        if cleaned.height() == 0 || range.bounds().is_none() {
            return Ok(cleaned.clone());
        }
        ensure_column(cleaned, CALENDAR_DATE)?;
        let selected = cleaned.clone().lazy().filter_date_range(range).collect()?;
        debug!(
            "Selected {} of {} rows for {:?}",
            selected.height(),
            cleaned.height(),
            range
        );
        Ok(selected)
    }

    /// KPI values, limit classification and ranking facts for `column`.
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::EmptySelection`] if `selected` has no rows and
    /// [`InsightError::UnknownColumn`] if `column` is not in the frame.
    pub fn summarize(
        &self,
        selected: &DataFrame,
        column: &str,
    ) -> Result<AggregateSummary, InsightError> {
        if selected.height() == 0 {
            return Err(InsightError::EmptySelection);
        }
        ensure_column(selected, column)?;
        ensure_column(selected, TIME)?;

        let values = col(column).cast(DataType::Float64);
        let stats = selected
            .clone()
            .lazy()
            .sort([TIME], SortMultipleOptions::default().with_maintain_order(true))
            .select([
                values.clone().last().alias("latest"),
                values.clone().mean().alias("mean"),
                values.max().alias("max"),
            ])
            .collect()?;

        let latest_value = first_f64(&stats, "latest")?;
        let limit = self.thresholds.limit_for(column);

        Ok(AggregateSummary {
            latest_value,
            mean_value: first_f64(&stats, "mean")?,
            max_value: first_f64(&stats, "max")?,
            record_count: selected.height(),
            limit,
            is_within_limit: is_within_limit(latest_value, limit),
            ranking: ranking_facts(selected, column)?,
        })
    }

    /// Selects `range` from `cleaned` and summarizes `column` over it.
    pub fn insights(
        &self,
        cleaned: &DataFrame,
        column: &str,
        range: DateRange,
    ) -> Result<Insights, InsightError> {
        let selected = self.select(cleaned, range)?;
        Ok(Insights {
            column: column.to_string(),
            summary: self.summarize(&selected, column)?,
        })
    }
}

fn ensure_column(frame: &DataFrame, column: &str) -> Result<(), InsightError> {
    match frame.get_column_index(column) {
        Some(_) => Ok(()),
        None => Err(InsightError::UnknownColumn(column.to_string())),
    }
}

fn first_f64(frame: &DataFrame, column: &str) -> Result<Option<f64>, InsightError> {
    Ok(frame.column(column)?.f64()?.get(0))
}

/// Mean of `column` per hour of day, ordered by hour.
pub fn hourly_profile(frame: &DataFrame, column: &str) -> Result<DataFrame, InsightError> {
    ensure_column(frame, column)?;
    ensure_column(frame, HOUR_OF_DAY)?;
    Ok(frame
        .clone()
        .lazy()
        .group_by([col(HOUR_OF_DAY).cast(DataType::UInt32)])
        .agg([col(column).cast(DataType::Float64).mean().alias(MEAN)])
        .sort([HOUR_OF_DAY], Default::default())
        .collect()?)
}

/// Mean of `column` per weekday, ordered Monday first.
pub fn daily_profile(frame: &DataFrame, column: &str) -> Result<DataFrame, InsightError> {
    ensure_column(frame, column)?;
    ensure_column(frame, DAY_OF_WEEK_RANK)?;
    ensure_column(frame, DAY_OF_WEEK)?;
    Ok(frame
        .clone()
        .lazy()
        .group_by([col(DAY_OF_WEEK_RANK).cast(DataType::UInt32)])
        .agg([
            col(DAY_OF_WEEK).first(),
            col(column).cast(DataType::Float64).mean().alias(MEAN),
        ])
        .sort([DAY_OF_WEEK_RANK], Default::default())
        .collect()?)
}

/// Mean of `column` per (weekday, hour), ordered Monday first and then by hour.
/// Backs the weekday-by-hour heatmap.
pub fn day_hour_matrix(frame: &DataFrame, column: &str) -> Result<DataFrame, InsightError> {
    ensure_column(frame, column)?;
    ensure_column(frame, DAY_OF_WEEK_RANK)?;
    ensure_column(frame, DAY_OF_WEEK)?;
    ensure_column(frame, HOUR_OF_DAY)?;
    Ok(frame
        .clone()
        .lazy()
        .group_by([
            col(DAY_OF_WEEK_RANK).cast(DataType::UInt32),
            col(HOUR_OF_DAY).cast(DataType::UInt32),
        ])
        .agg([
            col(DAY_OF_WEEK).first(),
            col(column).cast(DataType::Float64).mean().alias(MEAN),
        ])
        .sort([DAY_OF_WEEK_RANK, HOUR_OF_DAY], Default::default())
        .collect()?)
}

/// `(key, mean)` pairs of a profile, skipping groups without a mean.
fn keyed_means(profile: &DataFrame, key: &str) -> Result<Vec<(u32, f64)>, InsightError> {
    let keys = profile.column(key)?.u32()?;
    let means = profile.column(MEAN)?.f64()?;
    Ok(keys
        .into_iter()
        .zip(means)
        .filter_map(|(key, mean)| Some((key?, mean?)))
        .collect())
}

/// Key of the first pair that `better` prefers over every earlier one.
/// Pairs arrive in ascending key order, so ties go to the lowest key.
fn first_extremum(pairs: &[(u32, f64)], better: impl Fn(f64, f64) -> bool) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for &(key, mean) in pairs {
        match best {
            Some((_, current)) if !better(mean, current) => {}
            _ => best = Some((key, mean)),
        }
    }
    best.map(|(key, _)| key)
}

fn ranking_facts(frame: &DataFrame, column: &str) -> Result<Option<RankingFacts>, InsightError> {
    let hours = keyed_means(&hourly_profile(frame, column)?, HOUR_OF_DAY)?;
    let days = keyed_means(&daily_profile(frame, column)?, DAY_OF_WEEK_RANK)?;

    let worst_hour = first_extremum(&hours, |candidate, current| candidate > current);
    let best_hour = first_extremum(&hours, |candidate, current| candidate < current);
    let worst_day = first_extremum(&days, |candidate, current| candidate > current)
        .and_then(DayOfWeek::from_rank);

    Ok(match (best_hour, worst_hour, worst_day) {
        (Some(best_hour), Some(worst_hour), Some(worst_day)) => Some(RankingFacts {
            best_hour,
            worst_hour,
            worst_day,
        }),
        _ => None,
    })
}

/// Measurement columns of a cleaned frame, in frame order.
pub fn pollutant_columns(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .filter(|name| !NON_MEASUREMENT_COLUMNS.contains(name))
        .map(str::to_string)
        .collect()
}

/// Fine particles when available, otherwise the first column.
pub fn default_pollutant(columns: &[String]) -> Option<&str> {
    let preferred = Pollutant::Pm25.display_label();
    columns
        .iter()
        .find(|column| column.as_str() == preferred)
        .or_else(|| columns.first())
        .map(String::as_str)
}

/// Earliest and latest `calendar_date`, or `None` for a frame without dates.
pub fn date_bounds(frame: &DataFrame) -> Result<Option<(NaiveDate, NaiveDate)>, InsightError> {
    if frame.height() == 0 || frame.get_column_index(CALENDAR_DATE).is_none() {
        return Ok(None);
    }
    let dates: Vec<NaiveDate> = frame
        .column(CALENDAR_DATE)?
        .date()?
        .as_date_iter()
        .flatten()
        .collect();
    Ok(dates
        .iter()
        .min()
        .copied()
        .zip(dates.iter().max().copied()))
}
