//! The calendar-date selection used to zoom into a cleaned frame.

use chrono::NaiveDate;

/// A user-selected range over `calendar_date`.
///
/// The range only filters when it is *well formed*: both bounds are present
/// and `start <= end`. Anything else (a half-open selection while the user is
/// still picking dates, or reversed bounds) selects the full frame.
///
/// ```
/// use air_quality::DateRange;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
///
/// assert_eq!(DateRange::between(start, end).bounds(), Some((start, end)));
/// assert_eq!(DateRange::between(end, start).bounds(), None);
/// assert_eq!(DateRange::from_start(start).bounds(), None);
/// assert_eq!(DateRange::all().bounds(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn from_start(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// A selection with no bounds; passes every row through.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a range from however many dates a picker returned.
    /// Exactly two dates form a pair; any other count selects everything.
    pub fn from_selection(dates: &[NaiveDate]) -> Self {
        match dates {
            [start, end] => Self::between(*start, *end),
            _ => Self::all(),
        }
    }

    /// The inclusive bounds, if the range is well formed.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }
}

impl From<(NaiveDate, NaiveDate)> for DateRange {
    fn from((start, end): (NaiveDate, NaiveDate)) -> Self {
        Self::between(start, end)
    }
}
