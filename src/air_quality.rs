//! This module provides the main entry point of the crate. An [`AirQuality`] client
//! downloads hourly pollutant readings for one location, caches them for a while,
//! and turns them into cleaned frames and insight summaries.

use crate::error::AirQualityError;
use crate::fetch::data_loader::{AirQualityLoader, RawAirQuality};
use crate::fetch::frame_fetcher::FrameFetcher;
use crate::fetch::{DEFAULT_BASE_URL, DEFAULT_PAST_DAYS};
use crate::frame::CleanedFrame;
use crate::insights::aggregator::Aggregator;
use crate::insights::summary::Insights;
use crate::insights::threshold::ReferenceThresholds;
use crate::pipeline::cleaner::clean_at;
use crate::types::date_range::DateRange;
use bon::bon;
use log::info;
use std::time::Duration;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use air_quality::LatLon;
///
/// let zocalo = LatLon(19.4326, -99.1332);
/// assert_eq!(zocalo.0, 19.4326); // Latitude
/// assert_eq!(zocalo.1, -99.1332); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Default location: Mexico City.
pub const MEXICO_CITY: LatLon = LatLon(19.4326, -99.1332);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// The main client struct.
///
/// Holds the configured location, an in-memory cache of raw downloads, and the
/// [`Aggregator`] used for insight summaries.
///
/// # Examples
///
/// ```no_run
/// # use air_quality::{AirQuality, AirQualityError, DateRange};
/// # #[tokio::main]
/// # async fn main() -> Result<(), AirQualityError> {
/// let client = AirQuality::builder().build()?;
///
/// let cleaned = client.cleaned().past_days(14).call().await?;
/// if let Some(column) = cleaned.default_pollutant() {
///     let insights = client.insights(&cleaned, &column, DateRange::all())?;
///     println!("{} is {}", column, insights.summary.status());
///     println!("{}", insights);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AirQuality {
    location: LatLon,
    fetcher: FrameFetcher,
    aggregator: Aggregator,
}

#[bon]
impl AirQuality {
    /// Creates a new client.
    ///
    /// This method uses a builder pattern; every setting is optional.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: Coordinates to query. Defaults to [`MEXICO_CITY`].
    /// * `.timeout(Duration)`: Per-request timeout. Defaults to 15 seconds.
    /// * `.cache_ttl(Duration)`: How long a download is reused. Defaults to one hour.
    /// * `.base_url(String)`: Endpoint to query. Defaults to Open-Meteo's air-quality API.
    /// * `.thresholds(ReferenceThresholds)`: Limits used to classify the latest value.
    ///   Defaults to the WHO 24-hour guidelines.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::Fetch`] if the HTTP client cannot be built.
    #[builder]
    pub fn new(
        location: Option<LatLon>,
        timeout: Option<Duration>,
        cache_ttl: Option<Duration>,
        base_url: Option<String>,
        thresholds: Option<ReferenceThresholds>,
    ) -> Result<Self, AirQualityError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let loader = AirQualityLoader::new(&base_url, timeout.unwrap_or(DEFAULT_TIMEOUT))?;
        Ok(Self {
            location: location.unwrap_or(MEXICO_CITY),
            fetcher: FrameFetcher::new(loader, cache_ttl.unwrap_or(DEFAULT_CACHE_TTL)),
            aggregator: Aggregator::new(thresholds.unwrap_or_default()),
        })
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Fetches the raw readings of the last `past_days` days, reusing a cached
    /// download while it is fresh.
    ///
    /// # Arguments
    ///
    /// * `.past_days(u32)`: Lookback window, 7 to 90 days. Defaults to 30.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::Fetch`] for an out-of-range lookback, network
    /// and HTTP failures, and malformed responses.
    #[builder]
    pub async fn raw(&self, past_days: Option<u32>) -> Result<RawAirQuality, AirQualityError> {
        let past_days = past_days.unwrap_or(DEFAULT_PAST_DAYS);
        Ok(self.fetcher.get_cache_frame(self.location, past_days).await?)
    }

    /// Fetches and cleans the readings of the last `past_days` days.
    ///
    /// Future rows are dropped relative to the current time at the location.
    ///
    /// # Errors
    ///
    /// Everything [`AirQuality::raw`] returns, plus [`AirQualityError::Pipeline`]
    /// when the response has no usable `time` column.
    #[builder]
    pub async fn cleaned(&self, past_days: Option<u32>) -> Result<CleanedFrame, AirQualityError> {
        let raw = self.raw().maybe_past_days(past_days).call().await?;
        let cleaned = clean_at(raw.frame.clone(), raw.local_now())?;
        info!(
            "Cleaned frame for {:?}: {} rows, {} columns",
            self.location,
            cleaned.height(),
            cleaned.width()
        );
        Ok(CleanedFrame::new(cleaned))
    }

    /// Summary and narrative for `column` over the dates in `range`.
    ///
    /// # Errors
    ///
    /// Returns [`AirQualityError::Insight`] when the selection is empty or the
    /// column does not exist.
    pub fn insights(
        &self,
        cleaned: &CleanedFrame,
        column: &str,
        range: DateRange,
    ) -> Result<Insights, AirQualityError> {
        Ok(self.aggregator.insights(&cleaned.frame, column, range)?)
    }

    /// Forgets every cached download.
    pub async fn clear_cache(&self) {
        self.fetcher.clear().await;
    }
}
