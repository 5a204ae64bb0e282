use crate::air_quality::LatLon;
use crate::fetch::data_loader::{AirQualityLoader, RawAirQuality};
use crate::fetch::error::FetchError;
use log::debug;
use std::collections::{hash_map::Entry, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

type CacheKey = (u64, u64, u32);

#[derive(Debug, Clone)]
struct CachedFrame {
    fetched_at: Instant,
    raw: RawAirQuality,
}

impl CachedFrame {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Keeps raw fetches in memory for `ttl`, keyed by location and lookback.
pub struct FrameFetcher {
    loader: AirQualityLoader,
    ttl: Duration,
    cache: Mutex<HashMap<CacheKey, CachedFrame>>,
}

impl FrameFetcher {
    pub fn new(loader: AirQualityLoader, ttl: Duration) -> Self {
        Self {
            loader,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Gets the raw readings for a location, downloading only when no fresh copy is cached.
    pub async fn get_cache_frame(
        &self,
        location: LatLon,
        past_days: u32,
    ) -> Result<RawAirQuality, FetchError> {
        let key = (location.0.to_bits(), location.1.to_bits(), past_days);

        // Fast path
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(&key) {
                if cached.is_fresh(self.ttl) {
                    debug!("Cache hit for {:?} ({} days)", location, past_days);
                    return Ok(cached.raw.clone());
                }
            }
        }

        // Slow path, the download happens outside the lock.
        let raw = self.loader.get_frame(location, past_days).await?;

        let mut cache = self.cache.lock().await;
        match cache.entry(key) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_fresh(self.ttl) {
                    // Another task refreshed it while we were downloading.
                    Ok(entry.get().raw.clone())
                } else {
                    entry.insert(CachedFrame {
                        fetched_at: Instant::now(),
                        raw: raw.clone(),
                    });
                    Ok(raw)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(CachedFrame {
                    fetched_at: Instant::now(),
                    raw: raw.clone(),
                });
                Ok(raw)
            }
        }
    }

    /// Drops every cached fetch.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }
}
