//! Reference concentrations used to classify the latest reading as safe or not.

/// One guideline concentration, keyed by a fragment of a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub key: String,
    /// 24-hour guideline in µg/m³.
    pub limit: f64,
}

/// An ordered table of reference thresholds.
///
/// Built once at startup and handed to the [`crate::Aggregator`]; never
/// mutated afterwards. A selected column is matched against the table by
/// substring containment, first match wins. The default keys (`PM2.5`,
/// `PM10`, `NO2`, `Ozone`) do not overlap, so their order does not matter;
/// with overlapping custom keys the earlier entry shadows the later one.
///
/// ```
/// use air_quality::ReferenceThresholds;
///
/// let thresholds = ReferenceThresholds::default();
/// assert_eq!(thresholds.limit_for("PM2.5 (Fine Particles)"), Some(15.0));
/// assert_eq!(thresholds.limit_for("PM10 (Urban Dust)"), Some(45.0));
/// assert_eq!(thresholds.limit_for("CO"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceThresholds {
    entries: Vec<Threshold>,
}

impl ReferenceThresholds {
    /// Builds a table from `(key, limit)` pairs, keeping their order.
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, limit)| Threshold {
                    key: key.into(),
                    limit,
                })
                .collect(),
        }
    }

    /// Approximate WHO 24-hour mean guidelines.
    pub fn who_24h() -> Self {
        Self::new([("PM2.5", 15.0), ("PM10", 45.0), ("NO2", 25.0), ("Ozone", 100.0)])
    }

    pub fn entries(&self) -> &[Threshold] {
        &self.entries
    }

    /// The limit of the first entry whose key is contained in `label`.
    /// `None` means no applicable limit: every value counts as within it.
    pub fn limit_for(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| label.contains(entry.key.as_str()))
            .map(|entry| entry.limit)
    }
}

impl Default for ReferenceThresholds {
    fn default() -> Self {
        Self::who_24h()
    }
}

/// Strict comparison: a reading exactly at the limit is not within it.
/// A missing reading is never within the limit.
pub fn is_within_limit(latest: Option<f64>, limit: Option<f64>) -> bool {
    match (latest, limit) {
        (Some(value), Some(limit)) => value < limit,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
