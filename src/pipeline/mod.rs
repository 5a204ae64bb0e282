pub mod cleaner;
pub mod error;
pub mod interpolate;

/// Timestamp column delivered by the data source.
pub const TIME: &str = "time";
/// Hour of the reading, 0-23.
pub const HOUR_OF_DAY: &str = "hour_of_day";
/// Date-only projection of the timestamp.
pub const CALENDAR_DATE: &str = "calendar_date";
/// English weekday name of the reading.
pub const DAY_OF_WEEK: &str = "day_of_week";
/// Monday-first rank (0-6) of `day_of_week`; the structural ordering of the weekday category.
pub const DAY_OF_WEEK_RANK: &str = "day_of_week_rank";

/// Columns that are never pollutant measurements.
pub const NON_MEASUREMENT_COLUMNS: [&str; 5] = [
    TIME,
    HOUR_OF_DAY,
    CALENDAR_DATE,
    DAY_OF_WEEK,
    DAY_OF_WEEK_RANK,
];

/// Longest run of consecutive missing samples that interpolation will fill.
pub const MAX_INTERPOLATION_GAP: usize = 2;
