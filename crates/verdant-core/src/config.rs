//! Polling configuration.
//!
//! Owned state threaded into [`crate::poller::PollController`] at
//! construction and mutated only through its setter calls — never ambient
//! globals. The controller reads the config on every tick.

use std::time::Duration;

/// Default cadence between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Floor for the poll cadence; anything lower would hammer the sensor.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cadences offered by the dashboard UI.
pub const INTERVAL_PRESETS: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(5),
    Duration::from_secs(10),
];

/// Chart width: how many historical points each rolling series keeps.
pub const DEFAULT_SERIES_CAPACITY: usize = 40;

/// How one sample is obtained on each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Synthesize readings instead of fetching. Defaults to on, so a fresh
    /// dashboard shows moving data before any sensor is configured.
    pub use_mock: bool,
    /// Sensor endpoint URL, e.g. `http://192.168.4.1/sensor`. Empty means
    /// none configured; live mode then falls back to mock.
    pub endpoint_url: String,
    /// Cadence between scheduled polls.
    pub poll_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            endpoint_url: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
