//! Turns a raw hourly reading table into the cleaned, enriched table consumed
//! by the insight aggregator.
//!
//! The steps run in a fixed order because each one relies on the previous:
//!
//! 1. parse the `time` column into a Datetime column,
//! 2. drop rows stamped after "now",
//! 3. fill short gaps in every measurement column,
//! 4. derive `hour_of_day` and `calendar_date`,
//! 5. derive the Monday-first `day_of_week` category (label plus rank),
//! 6. rename source keys to their display labels.

use crate::pipeline::error::PipelineError;
use crate::pipeline::interpolate::{count_missing, interpolate_bounded};
use crate::pipeline::{
    CALENDAR_DATE, DAY_OF_WEEK, DAY_OF_WEEK_RANK, HOUR_OF_DAY, MAX_INTERPOLATION_GAP,
    NON_MEASUREMENT_COLUMNS, TIME,
};
use crate::types::day_of_week::DayOfWeek;
use crate::types::pollutant::Pollutant;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, info, warn};
use polars::prelude::*;

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Cleans `raw` using the local wall clock as "now".
///
/// See [`clean_at`] for the details.
pub fn clean(raw: DataFrame) -> Result<DataFrame, PipelineError> {
    clean_at(raw, Local::now().naive_local())
}

/// Cleans `raw`, dropping every row stamped strictly after `now`.
///
/// `now` must be expressed in the same wall clock as the `time` column
/// (the data source reports timestamps in the location's local time).
///
/// An empty input returns an empty frame without derived columns. A non-empty
/// input without a usable `time` column fails with
/// [`PipelineError::MissingRequiredField`]. Malformed measurements never fail:
/// gaps that cannot be interpolated are left as nulls.
///
/// # Example
///
/// ```
/// use air_quality::clean_at;
/// use chrono::NaiveDate;
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let raw = df!(
///     "time" => ["2024-03-04T00:00", "2024-03-04T01:00", "2024-03-04T02:00"],
///     "pm2_5" => [Some(10.0), None, Some(14.0)],
/// )?;
/// let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(12, 0, 0).unwrap();
///
/// let cleaned = clean_at(raw, now)?;
/// let values: Vec<Option<f64>> = cleaned
///     .column("PM2.5 (Fine Particles)")?
///     .f64()?
///     .into_iter()
///     .collect();
/// assert_eq!(values, [Some(10.0), Some(12.0), Some(14.0)]);
/// # Ok(())
/// # }
/// ```
pub fn clean_at(raw: DataFrame, now: NaiveDateTime) -> Result<DataFrame, PipelineError> {
    if raw.height() == 0 {
        debug!("Received an empty reading table, nothing to clean");
        return Ok(DataFrame::empty());
    }

    let mut df = raw;
    let timestamps = read_timestamps(&df)?;
    df.with_column(Series::new(TIME.into(), timestamps))?;

    let df = drop_future_rows(df, now)?;
    let mut df = interpolate_measurements(df)?;
    derive_calendar_columns(&mut df)?;
    let df = rename_pollutants(df)?;

    debug!("Cleaned reading table has shape {:?}", df.shape());
    Ok(df)
}

/// Reads the `time` column as wall-clock timestamps, whatever its encoding.
fn read_timestamps(df: &DataFrame) -> Result<Vec<NaiveDateTime>, PipelineError> {
    let column = df
        .column(TIME)
        .map_err(|_| PipelineError::missing(TIME, "column not present"))?;

    match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value
                    .ok_or_else(|| PipelineError::missing(TIME, format!("null at row {}", row)))?;
                parse_timestamp(value).ok_or_else(|| {
                    PipelineError::missing(
                        TIME,
                        format!("cannot parse '{}' at row {}", value, row),
                    )
                })
            })
            .collect(),
        DataType::Datetime(_, _) => column
            .datetime()?
            .as_datetime_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| PipelineError::missing(TIME, format!("null at row {}", row)))
            })
            .collect(),
        DataType::Date => column
            .date()?
            .as_date_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .map(|date| date.and_time(NaiveTime::MIN))
                    .ok_or_else(|| PipelineError::missing(TIME, format!("null at row {}", row)))
            })
            .collect(),
        other => Err(PipelineError::missing(
            TIME,
            format!("unsupported column type {}", other),
        )),
    }
}

/// Parses one timestamp string. Zoned timestamps keep their own wall time.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
        return Some(zoned.naive_local());
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn drop_future_rows(df: DataFrame, now: NaiveDateTime) -> Result<DataFrame, PipelineError> {
    let before = df.height();
    let kept = df.lazy().filter(col(TIME).lt_eq(lit(now))).collect()?;

    let dropped = before - kept.height();
    if dropped > 0 {
        info!("Dropped {} readings stamped after {}", dropped, now);
    }
    Ok(kept)
}

fn is_measurement(name: &str, dtype: &DataType) -> bool {
    !NON_MEASUREMENT_COLUMNS.contains(&name)
        && matches!(
            dtype,
            DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::UInt64
                | DataType::UInt32
        )
}

/// Interpolates every numeric measurement column, casting it to Float64.
fn interpolate_measurements(mut df: DataFrame) -> Result<DataFrame, PipelineError> {
    let targets: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|column| is_measurement(column.name().as_str(), column.dtype()))
        .map(|column| column.name().clone())
        .collect();

    for name in targets {
        let values: Vec<Option<f64>> = df
            .column(name.as_str())?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect();

        let filled = interpolate_bounded(&values, MAX_INTERPOLATION_GAP);
        let residual = count_missing(&filled);
        if residual > 0 {
            warn!(
                "{} samples of '{}' remain missing after interpolation",
                residual, name
            );
        }
        df.with_column(Series::new(name, filled))?;
    }

    Ok(df)
}

fn derive_calendar_columns(df: &mut DataFrame) -> Result<(), PipelineError> {
    let timestamps = read_timestamps(df)?;

    let hours: Vec<u32> = timestamps.iter().map(|ts| ts.hour()).collect();
    let dates: Vec<NaiveDate> = timestamps.iter().map(|ts| ts.date()).collect();
    let days: Vec<DayOfWeek> = timestamps
        .iter()
        .map(|ts| DayOfWeek::from(ts.weekday()))
        .collect();
    let labels: Vec<&str> = days.iter().map(DayOfWeek::label).collect();
    let ranks: Vec<u32> = days.iter().map(DayOfWeek::rank).collect();

    df.with_column(Series::new(HOUR_OF_DAY.into(), hours))?;
    df.with_column(Series::new(CALENDAR_DATE.into(), dates))?;
    df.with_column(Series::new(DAY_OF_WEEK.into(), labels))?;
    df.with_column(Series::new(DAY_OF_WEEK_RANK.into(), ranks))?;
    Ok(())
}

/// Renames source keys to display labels. Already renamed frames pass through unchanged.
///
/// The frame is rebuilt from its renamed columns so that its cached schema,
/// and every lazy query started from it, sees the new names.
fn rename_pollutants(df: DataFrame) -> Result<DataFrame, PipelineError> {
    let present: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut columns = df.take_columns();
    for column in columns.iter_mut() {
        let Some(pollutant) = Pollutant::from_source_key(column.name().as_str()) else {
            continue;
        };
        let label = pollutant.display_label();
        if present.iter().any(|name| name == label) {
            warn!(
                "Both '{}' and '{}' are present, keeping the source column name",
                pollutant.source_key(),
                label
            );
            continue;
        }
        column.rename(label.into());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    fn raw_frame() -> DataFrame {
        df!(
            "time" => [
                "2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00",
                "2024-01-01T03:00", "2024-01-01T04:00", "2024-01-01T05:00",
            ],
            "pm10" => [Some(10.0), None, Some(30.0), Some(40.0), None, Some(60.0)],
            "pm2_5" => [Some(1.0), None, None, None, Some(5.0), Some(6.0)],
            "carbon_monoxide" => [200.0, 210.0, 220.0, 230.0, 240.0, 250.0],
            "nitrogen_dioxide" => [None, Some(5.0), Some(6.0), Some(7.0), Some(8.0), Some(9.0)],
            "ozone" => [Some(50.0), Some(52.0), Some(54.0), Some(56.0), Some(58.0), None],
        )
        .unwrap()
    }

    #[test]
    fn test_clean_full_pipeline() -> Result<(), Box<dyn std::error::Error>> {
        let cleaned = clean_at(raw_frame(), at(1, 23))?;

        assert_eq!(cleaned.height(), 6);
        let names: Vec<&str> = cleaned
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "time",
                "PM10 (Urban Dust)",
                "PM2.5 (Fine Particles)",
                "CO",
                "NO2",
                "Ozone",
                "hour_of_day",
                "calendar_date",
                "day_of_week",
                "day_of_week_rank",
            ]
        );
        assert!(matches!(
            cleaned.column(TIME)?.dtype(),
            DataType::Datetime(_, None)
        ));

        assert_eq!(
            f64_values(&cleaned, "PM10 (Urban Dust)"),
            [Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0), Some(60.0)]
        );
        // A run of three missing samples is left alone.
        assert_eq!(
            f64_values(&cleaned, "PM2.5 (Fine Particles)"),
            [Some(1.0), None, None, None, Some(5.0), Some(6.0)]
        );
        // Edges borrow the nearest known value.
        assert_eq!(f64_values(&cleaned, "NO2")[0], Some(5.0));
        assert_eq!(f64_values(&cleaned, "Ozone")[5], Some(58.0));

        let hours: Vec<Option<u32>> = cleaned.column(HOUR_OF_DAY)?.u32()?.into_iter().collect();
        assert_eq!(hours, [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)]);

        let dates: Vec<Option<NaiveDate>> =
            cleaned.column(CALENDAR_DATE)?.date()?.as_date_iter().collect();
        assert!(dates
            .iter()
            .all(|date| *date == NaiveDate::from_ymd_opt(2024, 1, 1)));

        // 2024-01-01 was a Monday
        let labels: Vec<Option<&str>> = cleaned.column(DAY_OF_WEEK)?.str()?.into_iter().collect();
        assert!(labels.iter().all(|label| *label == Some("Monday")));
        let ranks: Vec<Option<u32>> = cleaned
            .column(DAY_OF_WEEK_RANK)?
            .u32()?
            .into_iter()
            .collect();
        assert!(ranks.iter().all(|rank| *rank == Some(0)));

        Ok(())
    }

    #[test]
    fn test_clean_drops_future_rows() -> Result<(), Box<dyn std::error::Error>> {
        let now = at(1, 3);
        let cleaned = clean_at(raw_frame(), now)?;

        assert_eq!(cleaned.height(), 4);
        assert!(cleaned
            .column(TIME)?
            .datetime()?
            .as_datetime_iter()
            .all(|ts| ts.is_some_and(|ts| ts <= now)));
        Ok(())
    }

    #[test]
    fn test_clean_interpolates_after_dropping_future_rows(
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Once 05:00 is dropped, the gap at 04:00 sits at the end of the table.
        let cleaned = clean_at(raw_frame(), at(1, 4))?;
        assert_eq!(
            f64_values(&cleaned, "PM10 (Urban Dust)"),
            [Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(40.0)]
        );
        Ok(())
    }

    #[test]
    fn test_clean_empty_input() -> Result<(), Box<dyn std::error::Error>> {
        let cleaned = clean_at(DataFrame::empty(), at(1, 0))?;
        assert_eq!(cleaned.height(), 0);
        assert_eq!(cleaned.width(), 0);

        let empty_with_schema = df!(
            "time" => Vec::<&str>::new(),
            "pm10" => Vec::<f64>::new(),
        )?;
        let cleaned = clean_at(empty_with_schema, at(1, 0))?;
        assert_eq!(cleaned.shape(), (0, 0));
        Ok(())
    }

    #[test]
    fn test_clean_without_time_column_fails() {
        let raw = df!("pm10" => [1.0, 2.0]).unwrap();
        let result = clean_at(raw, at(1, 0));
        assert!(matches!(
            result,
            Err(PipelineError::MissingRequiredField { ref field, .. }) if field == "time"
        ));
    }

    #[test]
    fn test_clean_with_unparseable_time_fails() {
        let raw = df!(
            "time" => ["2024-01-01T00:00", "yesterday"],
            "pm10" => [1.0, 2.0],
        )
        .unwrap();
        let result = clean_at(raw, at(2, 0));
        assert!(matches!(
            result,
            Err(PipelineError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn test_clean_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let once = clean_at(raw_frame(), at(1, 23))?;
        let twice = clean_at(once.clone(), at(1, 23))?;

        assert_eq!(once.get_column_names(), twice.get_column_names());
        assert!(once.equals_missing(&twice));
        Ok(())
    }

    #[test]
    fn test_clean_renamed_columns_are_visible_to_lazy_queries(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let raw = df!(
            "time" => ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
            "nitrogen_dioxide" => [10.0, 20.0, 30.0],
        )?;
        let cleaned = clean_at(raw, at(2, 0))?;

        let mut lazy = cleaned.clone().lazy();
        let schema = lazy.collect_schema()?;
        assert!(schema.contains("NO2"));
        assert!(!schema.contains("nitrogen_dioxide"));

        let mean = cleaned
            .lazy()
            .select([col("NO2").mean()])
            .collect()?;
        assert_eq!(mean.column("NO2")?.f64()?.get(0), Some(20.0));
        Ok(())
    }

    #[test]
    fn test_clean_uses_wall_clock() -> Result<(), Box<dyn std::error::Error>> {
        let now = Local::now().naive_local();
        let stamps: Vec<String> = [
            now - TimeDelta::hours(2),
            now - TimeDelta::hours(1),
            now + TimeDelta::days(1),
        ]
        .iter()
        .map(|ts| ts.format("%Y-%m-%dT%H:%M").to_string())
        .collect();
        let raw = df!("time" => stamps, "pm10" => [1.0, 2.0, 3.0])?;

        let cleaned = clean(raw)?;
        let after = Local::now().naive_local();

        assert_eq!(cleaned.height(), 2);
        assert!(cleaned
            .column(TIME)?
            .datetime()?
            .as_datetime_iter()
            .all(|ts| ts.is_some_and(|ts| ts <= after)));
        Ok(())
    }

    #[test]
    fn test_clean_tolerates_unordered_and_duplicate_timestamps(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let raw = df!(
            "time" => [
                "2024-01-02T05:00",
                "2024-01-02T03:00",
                "2024-01-02T03:00",
                "2024-01-02T04:00",
            ],
            "ozone" => [Some(1.0), None, Some(3.0), Some(4.0)],
        )?;
        let cleaned = clean_at(raw, at(3, 0))?;

        assert_eq!(cleaned.height(), 4);
        assert_eq!(
            f64_values(&cleaned, "Ozone"),
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]
        );
        Ok(())
    }

    #[test]
    fn test_clean_week_boundaries() -> Result<(), Box<dyn std::error::Error>> {
        // Sunday 2024-01-07 23:00 followed by Monday 2024-01-08 00:00
        let raw = df!(
            "time" => ["2024-01-07T23:00", "2024-01-08T00:00"],
            "pm10" => [5.0, 6.0],
        )?;
        let cleaned = clean_at(raw, at(9, 0))?;

        let labels: Vec<Option<&str>> = cleaned.column(DAY_OF_WEEK)?.str()?.into_iter().collect();
        assert_eq!(labels, [Some("Sunday"), Some("Monday")]);
        let ranks: Vec<Option<u32>> = cleaned
            .column(DAY_OF_WEEK_RANK)?
            .u32()?
            .into_iter()
            .collect();
        assert_eq!(ranks, [Some(6), Some(0)]);
        let hours: Vec<Option<u32>> = cleaned.column(HOUR_OF_DAY)?.u32()?.into_iter().collect();
        assert_eq!(hours, [Some(23), Some(0)]);
        Ok(())
    }

    #[test]
    fn test_clean_integer_measurements_become_float() -> Result<(), Box<dyn std::error::Error>> {
        let raw = df!(
            "time" => ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T02:00"],
            "pm10" => [Some(4i64), None, Some(8i64)],
        )?;
        let cleaned = clean_at(raw, at(2, 0))?;
        assert_eq!(
            f64_values(&cleaned, "PM10 (Urban Dust)"),
            [Some(4.0), Some(6.0), Some(8.0)]
        );
        Ok(())
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Some(at(5, 13));
        assert_eq!(parse_timestamp("2024-01-05T13:00"), expected);
        assert_eq!(parse_timestamp("2024-01-05T13:00:00"), expected);
        assert_eq!(parse_timestamp("2024-01-05 13:00"), expected);
        assert_eq!(parse_timestamp(" 2024-01-05 13:00:00 "), expected);
        assert_eq!(parse_timestamp("2024-01-05T13:00:00-06:00"), expected);
        assert_eq!(parse_timestamp("13:00 on the fifth"), None);
    }
}
