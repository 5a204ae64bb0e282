use crate::pipeline::CALENDAR_DATE;
use crate::types::date_range::DateRange;
use chrono::NaiveDate;
use polars::prelude::{col, lit, DataType, LazyFrame};

pub trait AirQualityFrameFilterExt {
    /// Filters a cleaned LazyFrame by a calendar-date range (inclusive).
    /// Assumes the 'calendar_date' column holds dates.
    ///
    /// # Arguments
    /// * `start`: The first date to keep.
    /// * `end`: The last date to keep.
    ///
    /// # Returns
    /// A new `LazyFrame` with the filter applied. Type errors surface when
    /// the frame is collected.
    fn filter_dates(self, start: NaiveDate, end: NaiveDate) -> LazyFrame;

    /// Filters by a [`DateRange`] selection. A range that is not well formed
    /// (a bound missing, or start after end) leaves the frame unfiltered.
    fn filter_date_range(self, range: DateRange) -> LazyFrame;
}

impl AirQualityFrameFilterExt for LazyFrame {
    fn filter_dates(self, start: NaiveDate, end: NaiveDate) -> LazyFrame {
        self.filter(
            col(CALENDAR_DATE)
                .cast(DataType::Date)
                .gt_eq(lit(start))
                .and(col(CALENDAR_DATE).cast(DataType::Date).lt_eq(lit(end))),
        )
    }

    fn filter_date_range(self, range: DateRange) -> LazyFrame {
        match range.bounds() {
            Some((start, end)) => self.filter_dates(start, end),
            None => self,
        }
    }
}
