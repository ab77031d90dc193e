//! Sensor readings and the metrics they carry.
//!
//! A [`Reading`] is one snapshot of the four grow-room metrics. Every field
//! is optional on the wire: a sensor node that lost its soil probe still
//! sends the rest, and the dashboard shows the missing value as unknown
//! instead of rejecting the whole snapshot. Extension fields (nutrient,
//! water level, ...) pass through opaquely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four metrics the dashboard tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Air temperature in °C.
    Temperature,
    /// Relative air humidity in %.
    Humidity,
    /// Soil moisture in %.
    Soil,
    /// Illuminance in lux.
    Light,
}

/// All metrics in display order.
pub const METRICS: [Metric; 4] = [
    Metric::Temperature,
    Metric::Humidity,
    Metric::Soil,
    Metric::Light,
];

impl Metric {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Soil => "Soil moisture",
            Self::Light => "Light",
        }
    }

    /// Display unit suffix.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Soil => "%",
            Self::Light => "lx",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Humidity => write!(f, "humidity"),
            Self::Soil => write!(f, "soil"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// One snapshot of sensor values.
///
/// Wire format is a flat JSON object:
///
/// ```json
/// { "temperature": 23.4, "humidity": 51.0, "soil": 47.0, "light": 820.0, "nutrient": 3.1 }
/// ```
///
/// Unknown keys land in [`Reading::extra`] and survive a round-trip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    /// Air temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    pub humidity: Option<f64>,
    /// Soil moisture in %.
    pub soil: Option<f64>,
    /// Illuminance in lux.
    pub light: Option<f64>,
    /// Extension fields carried opaquely (nutrient, water level, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Reading {
    /// Value of one metric, if the snapshot carries it.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Soil => self.soil,
            Metric::Light => self.light,
        }
    }

    /// True when all four core metrics are present.
    pub fn is_complete(&self) -> bool {
        METRICS.iter().all(|&m| self.metric(m).is_some())
    }
}
