use crate::air_quality::LatLon;
use crate::fetch::error::FetchError;
use crate::fetch::{MAX_PAST_DAYS, MIN_PAST_DAYS};
use crate::pipeline::TIME;
use crate::types::pollutant::Pollutant;
use chrono::{Duration as TimeDelta, NaiveDateTime, Utc};
use log::{debug, info, warn};
use polars::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Hourly readings exactly as delivered by the data source.
///
/// `frame` has a String `time` column followed by one Float64 column per
/// pollutant source key that the response contained.
#[derive(Debug, Clone)]
pub struct RawAirQuality {
    pub frame: DataFrame,
    /// Offset of the location's wall clock from UTC.
    pub utc_offset_seconds: i32,
    /// IANA name of the location's timezone, when reported.
    pub timezone: Option<String>,
}

impl RawAirQuality {
    /// Current wall-clock time at the location, the clock `time` is expressed in.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + TimeDelta::seconds(i64::from(self.utc_offset_seconds))
    }
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: Option<String>,
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    measurements: BTreeMap<String, Vec<Option<f64>>>,
}

pub(crate) fn validate_past_days(past_days: u32) -> Result<(), FetchError> {
    if (MIN_PAST_DAYS..=MAX_PAST_DAYS).contains(&past_days) {
        Ok(())
    } else {
        Err(FetchError::LookbackOutOfRange {
            days: past_days,
            min: MIN_PAST_DAYS,
            max: MAX_PAST_DAYS,
        })
    }
}

/// Converts a response body into a [`RawAirQuality`].
pub(crate) fn parse_response(body: &[u8]) -> Result<RawAirQuality, FetchError> {
    let response: AirQualityResponse = serde_json::from_slice(body)?;
    let hourly = response
        .hourly
        .ok_or_else(|| FetchError::UnexpectedFormat("missing 'hourly' block".to_string()))?;

    let expected = hourly.time.len();
    let mut columns = vec![Column::new(TIME.into(), hourly.time)];
    let mut measurements = hourly.measurements;

    for pollutant in Pollutant::ALL {
        let key = pollutant.source_key();
        let Some(values) = measurements.remove(key) else {
            warn!("Response did not contain '{}' readings", key);
            continue;
        };
        if values.len() != expected {
            return Err(FetchError::ColumnLength {
                column: key.to_string(),
                expected,
                found: values.len(),
            });
        }
        columns.push(Column::new(key.into(), values));
    }
    if !measurements.is_empty() {
        debug!(
            "Ignoring unrequested hourly columns: {:?}",
            measurements.keys().collect::<Vec<_>>()
        );
    }

    Ok(RawAirQuality {
        frame: DataFrame::new(columns)?,
        utc_offset_seconds: response.utc_offset_seconds,
        timezone: response.timezone,
    })
}

pub struct AirQualityLoader {
    base_url: String,
    download_client: Client,
}

impl AirQualityLoader {
    /// Creates a loader whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<AirQualityLoader, FetchError> {
        let download_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(AirQualityLoader {
            base_url: base_url.to_string(),
            download_client,
        })
    }

    /// Downloads the last `past_days` days of hourly readings for `location`.
    pub async fn get_frame(
        &self,
        location: LatLon,
        past_days: u32,
    ) -> Result<RawAirQuality, FetchError> {
        validate_past_days(past_days)?;
        let body = self.download(location, past_days).await?;
        let raw = parse_response(&body)?;
        info!(
            "Loaded {} hourly readings for {:?} ({} days, timezone {:?})",
            raw.frame.height(),
            location,
            past_days,
            raw.timezone
        );
        Ok(raw)
    }

    async fn download(&self, location: LatLon, past_days: u32) -> Result<Vec<u8>, FetchError> {
        let url = &self.base_url;
        info!("Downloading air quality data from {}", url);

        let response = self
            .download_client
            .get(url)
            .query(&[
                ("latitude", location.0.to_string()),
                ("longitude", location.1.to_string()),
                ("hourly", Pollutant::hourly_query()),
                ("timezone", "auto".to_string()),
                ("past_days", past_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.clone(), e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
