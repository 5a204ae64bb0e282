pub mod data_loader;
pub mod error;
pub mod frame_fetcher;

#[cfg(test)]
pub(crate) mod test_server;

/// Open-Meteo air-quality endpoint.
pub const DEFAULT_BASE_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Shortest lookback window, in days, accepted by the client.
pub const MIN_PAST_DAYS: u32 = 7;
/// Longest lookback window, in days, accepted by the client.
pub const MAX_PAST_DAYS: u32 = 90;
pub const DEFAULT_PAST_DAYS: u32 = 30;
