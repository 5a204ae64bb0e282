//! Result types of the insight aggregator and the narrative built from them.

use crate::types::day_of_week::DayOfWeek;
use std::fmt;

/// Hour and weekday extrema of the grouped means of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingFacts {
    /// Hour (0-23) with the lowest mean; the best time to be outdoors.
    pub best_hour: u32,
    /// Hour (0-23) with the highest mean.
    pub worst_hour: u32,
    /// Weekday with the highest mean.
    pub worst_day: DayOfWeek,
}

/// Whether the latest reading is below the applicable reference threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitStatus {
    Within,
    Above,
}

impl fmt::Display for LimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitStatus::Within => write!(f, "Within WHO Norm"),
            LimitStatus::Above => write!(f, "Above WHO Norm"),
        }
    }
}

/// KPI values and ranking facts for one column over one date selection.
///
/// Computed on request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    /// Value of the chronologically last row; `None` if that sample is a residual gap.
    pub latest_value: Option<f64>,
    /// Mean over present values; `None` if every value is missing.
    pub mean_value: Option<f64>,
    pub max_value: Option<f64>,
    /// Number of rows in the selection, missing values included.
    pub record_count: usize,
    /// Applicable reference threshold, `None` when no threshold matches.
    pub limit: Option<f64>,
    pub is_within_limit: bool,
    /// `None` when no hour or weekday group has a mean.
    pub ranking: Option<RankingFacts>,
}

impl AggregateSummary {
    pub fn status(&self) -> LimitStatus {
        if self.is_within_limit {
            LimitStatus::Within
        } else {
            LimitStatus::Above
        }
    }
}

/// A summary together with the column it describes.
///
/// Its `Display` implementation renders the automated insight text.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub column: String,
    pub summary: AggregateSummary,
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ranking) = self.summary.ranking else {
            return write!(
                f,
                "Not enough measurements of {} to rank hours and days.",
                self.column
            );
        };
        writeln!(
            f,
            "- Recommendation: The best time for outdoor activities is around {}:00 hrs.",
            ranking.best_hour
        )?;
        writeln!(
            f,
            "- Caution: Pollution levels tend to peak at {}:00 hrs.",
            ranking.worst_hour
        )?;
        write!(
            f,
            "- Weekly Trend: {}s have recorded the highest average of {} in this period.",
            ranking.worst_day, self.column
        )
    }
}
