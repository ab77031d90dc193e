//! Sample sources: synthetic generation and remote fetch with fallback.
//!
//! The contract is that [`SampleSource::fetch_one`] never fails. Every
//! failure path (no endpoint configured, network error, bad status,
//! malformed body) resolves to a synthetic reading tagged with a typed
//! [`FallbackReason`], so the dashboard keeps showing something plausible
//! instead of stalling on sensor-network flakiness, and renderers can
//! tell "live" from "mock-due-to-failure" without string matching.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PollConfig;
use crate::reading::Reading;

/// Per-request timeout for the remote fetch. A slow sensor node must not
/// stall the dashboard for longer than a couple of poll intervals.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// Why a live fetch fell back to the mock generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Live mode requested but no endpoint configured. Not an error.
    NoEndpoint,
    /// Transport failure: DNS, refused connection, timeout.
    Network,
    /// The endpoint answered with a non-success status.
    BadStatus,
    /// The body was not a JSON object.
    BadBody,
}

impl FallbackReason {
    /// Short human-readable cause, for notices like "using mock values".
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoEndpoint => "no endpoint set",
            Self::Network => "network error",
            Self::BadStatus => "bad response status",
            Self::BadBody => "malformed response body",
        }
    }
}

/// Where a sample's reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", content = "reason", rename_all = "snake_case")]
pub enum SampleOrigin {
    /// Fetched from the configured endpoint.
    Live,
    /// Synthesized because mock mode is on.
    Mock,
    /// Synthesized because the live fetch failed.
    Fallback(FallbackReason),
}

impl SampleOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Badge text for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
            Self::Fallback(_) => "mock (fallback)",
        }
    }
}

/// One captured reading plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub reading: Reading,
    pub origin: SampleOrigin,
    /// Capture time, milliseconds since the Unix epoch.
    pub taken_at_ms: u64,
}

impl Sample {
    fn new(reading: Reading, origin: SampleOrigin) -> Self {
        Self {
            reading,
            origin,
            taken_at_ms: unix_millis(),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ---------------------------------------------------------------------------
// SampleSource
// ---------------------------------------------------------------------------

/// Anything that can produce one sample per tick.
///
/// Implementations must not fail: a usable [`Sample`] comes back on every
/// call. The poll controller holds its source behind this trait so tests
/// can feed it scripted readings.
pub trait SampleSource: Send + Sync {
    fn fetch_one(&self, config: &PollConfig) -> Sample;
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Synthetic reading generator.
///
/// Each metric follows its own smooth oscillation (distinct periods and
/// phases so metrics don't move in lockstep) plus bounded uniform jitter,
/// so successive readings look like a drifting sensor rather than i.i.d.
/// noise. Soil is clamped to [0, 100] and light to [0, 2000]; temperature
/// and humidity are rounded to one decimal place.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

// Oscillation periods in milliseconds.
const TEMP_PERIOD_MS: f64 = 60_000.0;
const HUMIDITY_PERIOD_MS: f64 = 45_000.0;
const SOIL_PERIOD_MS: f64 = 90_000.0;
const LIGHT_PERIOD_MS: f64 = 30_000.0;

impl MockGenerator {
    /// A jittered reading for the current wall-clock time.
    pub fn reading_now(&self) -> Reading {
        self.reading_at(unix_millis(), &mut rand::rng())
    }

    /// A jittered reading for an arbitrary timestamp. Pure given the rng.
    pub fn reading_at(&self, unix_ms: u64, rng: &mut impl Rng) -> Reading {
        let ms = unix_ms as f64;
        let temperature = 18.0 + 10.0 * (ms / TEMP_PERIOD_MS).sin() + rng.random_range(-0.4..=0.4);
        let humidity =
            45.0 + 20.0 * (ms / HUMIDITY_PERIOD_MS).cos() + rng.random_range(-0.7..=0.7);
        let soil = 35.0 + 35.0 * (ms / SOIL_PERIOD_MS).sin() + rng.random_range(-1.5..=1.5);
        let light =
            120.0 + 200.0 * (ms / LIGHT_PERIOD_MS).sin().abs() + rng.random_range(-10.0..=10.0);

        Reading {
            temperature: Some(round1(temperature)),
            humidity: Some(round1(humidity)),
            soil: Some(soil.clamp(0.0, 100.0).round()),
            light: Some(light.clamp(0.0, 2000.0).round()),
            ..Default::default()
        }
    }

    /// The jitter-free waveform value for a timestamp. Deterministic;
    /// used by the sensor simulator's smoke-test mode.
    pub fn baseline_at(&self, unix_ms: u64) -> Reading {
        let ms = unix_ms as f64;
        Reading {
            temperature: Some(round1(18.0 + 10.0 * (ms / TEMP_PERIOD_MS).sin())),
            humidity: Some(round1(45.0 + 20.0 * (ms / HUMIDITY_PERIOD_MS).cos())),
            soil: Some((35.0 + 35.0 * (ms / SOIL_PERIOD_MS).sin()).clamp(0.0, 100.0).round()),
            light: Some(
                (120.0 + 200.0 * (ms / LIGHT_PERIOD_MS).sin().abs())
                    .clamp(0.0, 2000.0)
                    .round(),
            ),
            ..Default::default()
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Sampler
// ---------------------------------------------------------------------------

/// The production source: mock generation or remote fetch per the config,
/// with silent-but-typed fallback.
pub struct Sampler {
    mock: MockGenerator,
    client: reqwest::blocking::Client,
}

impl Sampler {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            mock: MockGenerator,
            client,
        }
    }

    /// Single uncached GET against the endpoint.
    ///
    /// Any JSON object is accepted; metrics the body lacks surface as
    /// unknown at display time rather than failing the sample.
    fn fetch_live(&self, url: &str) -> Result<Reading, FallbackReason> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .map_err(|e| {
                warn!("sensor fetch failed ({url}): {e}");
                FallbackReason::Network
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("sensor endpoint returned {status} ({url})");
            return Err(FallbackReason::BadStatus);
        }

        response.json::<Reading>().map_err(|e| {
            warn!("sensor body unreadable ({url}): {e}");
            FallbackReason::BadBody
        })
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for Sampler {
    fn fetch_one(&self, config: &PollConfig) -> Sample {
        if config.use_mock {
            return Sample::new(self.mock.reading_now(), SampleOrigin::Mock);
        }
        if config.endpoint_url.is_empty() {
            warn!("live mode with no endpoint set — using mock values");
            return Sample::new(
                self.mock.reading_now(),
                SampleOrigin::Fallback(FallbackReason::NoEndpoint),
            );
        }
        match self.fetch_live(&config.endpoint_url) {
            Ok(reading) => Sample::new(reading, SampleOrigin::Live),
            Err(reason) => Sample::new(
                self.mock.reading_now(),
                SampleOrigin::Fallback(reason),
            ),
        }
    }
}
