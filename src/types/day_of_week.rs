//! Defines `DayOfWeek`, the ordered weekday category attached to every cleaned reading.

use chrono::Weekday;
use std::fmt;
use std::str::FromStr;

/// A weekday with an explicit Monday-first rank.
///
/// Grouping and sorting by weekday always goes through [`DayOfWeek::rank`]
/// (Monday = 0 .. Sunday = 6), never through the label's string order or the
/// order in which days happen to appear in a dataset.
///
/// ```
/// use air_quality::DayOfWeek;
///
/// assert_eq!(DayOfWeek::Monday.rank(), 0);
/// assert_eq!(DayOfWeek::from_rank(6), Some(DayOfWeek::Sunday));
/// assert_eq!(DayOfWeek::Wednesday.label(), "Wednesday");
/// assert!(DayOfWeek::Friday < DayOfWeek::Saturday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl DayOfWeek {
    /// The seven weekdays in canonical order.
    pub const ORDERED: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn rank(&self) -> u32 {
        *self as u32
    }

    pub fn from_rank(rank: u32) -> Option<Self> {
        Self::ORDERED.get(rank as usize).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::ORDERED[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned when a string is not one of the seven English weekday names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a weekday name")]
pub struct ParseDayOfWeekError(pub String);

impl FromStr for DayOfWeek {
    type Err = ParseDayOfWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDERED
            .into_iter()
            .find(|day| day.label() == s)
            .ok_or_else(|| ParseDayOfWeekError(s.to_string()))
    }
}
