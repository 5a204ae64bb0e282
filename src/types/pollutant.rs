//! Defines the `Pollutant` enum, mapping the source keys used by the air-quality
//! service to the human-readable labels shown to end users.

use std::fmt;

/// One of the pollutants tracked for the monitored location.
///
/// Every pollutant has a stable *source key* (the column name delivered by the
/// data source) and a *display label* (the column name after cleaning). The
/// mapping is 1:1 and never changes at runtime.
///
/// ```
/// use air_quality::Pollutant;
///
/// assert_eq!(Pollutant::Pm25.source_key(), "pm2_5");
/// assert_eq!(Pollutant::Pm25.display_label(), "PM2.5 (Fine Particles)");
/// assert_eq!(Pollutant::from_source_key("ozone"), Some(Pollutant::Ozone));
/// assert_eq!(Pollutant::from_display_label("CO"), Some(Pollutant::CarbonMonoxide));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    /// Coarse particulate matter (`pm10`).
    Pm10,
    /// Fine particulate matter (`pm2_5`).
    Pm25,
    /// Carbon monoxide (`carbon_monoxide`).
    CarbonMonoxide,
    /// Nitrogen dioxide (`nitrogen_dioxide`).
    NitrogenDioxide,
    /// Ground-level ozone (`ozone`).
    Ozone,
}

impl Pollutant {
    /// All tracked pollutants, in the order they are requested from the data source.
    pub const ALL: [Pollutant; 5] = [
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::CarbonMonoxide,
        Pollutant::NitrogenDioxide,
        Pollutant::Ozone,
    ];

    /// The column name used by the data source.
    pub fn source_key(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm2_5",
            Pollutant::CarbonMonoxide => "carbon_monoxide",
            Pollutant::NitrogenDioxide => "nitrogen_dioxide",
            Pollutant::Ozone => "ozone",
        }
    }

    /// The column name after cleaning.
    pub fn display_label(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "PM10 (Urban Dust)",
            Pollutant::Pm25 => "PM2.5 (Fine Particles)",
            Pollutant::CarbonMonoxide => "CO",
            Pollutant::NitrogenDioxide => "NO2",
            Pollutant::Ozone => "Ozone",
        }
    }

    pub fn from_source_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.source_key() == key)
    }

    pub fn from_display_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.display_label() == label)
    }

    /// Comma separated source keys, as expected by the `hourly` query parameter.
    pub(crate) fn hourly_query() -> String {
        Self::ALL
            .iter()
            .map(Pollutant::source_key)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}
