//! # verdant-core
//!
//! **Your grow room, one glance.**
//!
//! `verdant-core` is the polling pipeline behind the verdant dashboard:
//! fetch-or-mock a sensor reading, roll it into fixed-width history
//! buffers, evaluate a declarative rule table, and hand the result to a
//! renderer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use verdant_core::{PollConfig, PollController, RuleTable};
//!
//! // Mock mode is the default — data flows before any sensor exists.
//! let mut controller = PollController::new(
//!     PollConfig::default(),
//!     RuleTable::default(),
//!     verdant_core::DEFAULT_SERIES_CAPACITY,
//! );
//! controller.start();
//!
//! let snapshot = controller.snapshot();
//! if let Some(advisory) = &snapshot.advisory {
//!     println!("{}", advisory.headline);
//! }
//! ```
//!
//! ## Architecture
//!
//! Source → Controller tick → RollingSeries + AdvisoryResult → Snapshot
//!
//! - A [`SampleSource`] never fails: live-fetch problems resolve to a
//!   synthetic reading tagged with a typed [`FallbackReason`], so the
//!   dashboard keeps moving through sensor-network flakiness.
//! - [`RollingSeries`] buffers are fixed-width FIFO windows; there is no
//!   persistence and no unbounded growth, ever.
//! - The [`RuleTable`] is data, not control flow: thresholds and tip text
//!   can be tuned (or loaded from JSON) without touching the evaluator.
//! - [`PollController`] owns one cancellable repeating worker; settings
//!   changes restart it by replace, never by stacking.

pub mod advice;
pub mod config;
pub mod poller;
pub mod reading;
pub mod series;
pub mod source;

pub use advice::{
    AdviceRule, AdvisoryResult, Band, Condition, NOMINAL_HEADLINE, RuleTable, RuleTableError,
};
pub use config::{
    DEFAULT_POLL_INTERVAL, DEFAULT_SERIES_CAPACITY, INTERVAL_PRESETS, MIN_POLL_INTERVAL,
    PollConfig,
};
pub use poller::{DashboardSnapshot, PollController};
pub use reading::{METRICS, Metric, Reading};
pub use series::{MetricSeries, RollingSeries};
pub use source::{
    FETCH_TIMEOUT, FallbackReason, MockGenerator, Sample, SampleOrigin, SampleSource, Sampler,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
