//! The polling schedule and the dashboard state it feeds.
//!
//! [`PollController`] is a two-state machine: Idle (no worker) and
//! Polling (one repeating worker at the configured cadence). Restart is
//! by replace: the old worker is signalled and joined before a new one
//! spawns, so duplicate tickers cannot stack up after a settings change.
//!
//! Every tick runs the same pipeline: fetch one sample, push each metric
//! into its rolling series, evaluate the rule table, publish the result.
//! All shared mutation funnels through one state mutex, so a manual
//! [`PollController::poll_once`] may overlap a scheduled tick without
//! corrupting a series; displayed values are last-writer-wins, which is
//! fine because samples are idempotent snapshots, not deltas.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::advice::{AdvisoryResult, RuleTable};
use crate::config::{MIN_POLL_INTERVAL, PollConfig};
use crate::reading::{Metric, Reading};
use crate::series::MetricSeries;
use crate::source::{Sample, SampleSource, Sampler};

/// Granularity at which a sleeping worker rechecks its stop flag.
const STOP_CHECK_SLICE: Duration = Duration::from_millis(25);

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// One rolling series per metric.
#[derive(Debug, Clone)]
struct SeriesSet {
    temperature: MetricSeries,
    humidity: MetricSeries,
    soil: MetricSeries,
    light: MetricSeries,
}

impl SeriesSet {
    fn new(capacity: usize) -> Self {
        Self {
            temperature: MetricSeries::new(capacity),
            humidity: MetricSeries::new(capacity),
            soil: MetricSeries::new(capacity),
            light: MetricSeries::new(capacity),
        }
    }

    fn push_reading(&mut self, reading: &Reading) {
        self.temperature.push(reading.metric(Metric::Temperature));
        self.humidity.push(reading.metric(Metric::Humidity));
        self.soil.push(reading.metric(Metric::Soil));
        self.light.push(reading.metric(Metric::Light));
    }
}

/// Shared state written by ticks, read by renderers.
struct DashboardState {
    series: SeriesSet,
    latest: Option<Sample>,
    advisory: Option<AdvisoryResult>,
    tick_count: u64,
}

/// All state a renderer needs, captured under a single lock.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub soil: Vec<Option<f64>>,
    pub light: Vec<Option<f64>>,
    pub latest: Option<Sample>,
    pub advisory: Option<AdvisoryResult>,
    pub tick_count: u64,
    pub polling: bool,
    pub use_mock: bool,
    pub endpoint_url: String,
    pub poll_interval: Duration,
    pub capacity: usize,
}

impl DashboardSnapshot {
    /// Rolling history of one metric, oldest first.
    pub fn series(&self, metric: Metric) -> &[Option<f64>] {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::Soil => &self.soil,
            Metric::Light => &self.light,
        }
    }
}

// ---------------------------------------------------------------------------
// PollController
// ---------------------------------------------------------------------------

struct PollWorker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the repeating schedule and the dashboard buffers.
pub struct PollController {
    config: PollConfig,
    rules: Arc<RuleTable>,
    source: Arc<dyn SampleSource>,
    shared: Arc<Mutex<DashboardState>>,
    capacity: usize,
    worker: Option<PollWorker>,
}

impl PollController {
    /// Controller with the production [`Sampler`] as its source.
    pub fn new(config: PollConfig, rules: RuleTable, capacity: usize) -> Self {
        Self::with_source(Arc::new(Sampler::new()), config, rules, capacity)
    }

    /// Controller with an injected source (tests feed scripted readings).
    pub fn with_source(
        source: Arc<dyn SampleSource>,
        mut config: PollConfig,
        rules: RuleTable,
        capacity: usize,
    ) -> Self {
        config.poll_interval = config.poll_interval.max(MIN_POLL_INTERVAL);
        Self {
            config,
            rules: Arc::new(rules),
            source,
            shared: Arc::new(Mutex::new(DashboardState {
                series: SeriesSet::new(capacity),
                latest: None,
                advisory: None,
                tick_count: 0,
            })),
            capacity: capacity.max(1),
            worker: None,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Whether a repeating worker is active.
    pub fn is_polling(&self) -> bool {
        self.worker.is_some()
    }

    /// Enter Polling. Idempotent restart: any existing worker is replaced,
    /// and one immediate out-of-band poll runs so the first data does not
    /// wait a full interval.
    pub fn start(&mut self) {
        self.stop();

        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let source = Arc::clone(&self.source);
        let rules = Arc::clone(&self.rules);
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();

        debug!("poller starting at {:?}", config.poll_interval);
        let handle = thread::spawn(move || {
            run_tick(&*source, &config, &rules, &shared);
            loop {
                if wait_cancellable(config.poll_interval, &flag) {
                    return;
                }
                run_tick(&*source, &config, &rules, &shared);
            }
        });

        self.worker = Some(PollWorker { stop, handle });
    }

    /// Enter Idle. Signals and joins the worker, if any.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            let _ = worker.handle.join();
            debug!("poller stopped");
        }
    }

    /// Update the cadence. While Polling this restarts the schedule — no
    /// dead period, no stacked timers.
    pub fn set_interval(&mut self, interval: Duration) {
        self.config.poll_interval = interval.max(MIN_POLL_INTERVAL);
        if self.is_polling() {
            self.start();
        }
    }

    /// Apply a new endpoint URL; restarts the schedule while Polling.
    pub fn set_endpoint(&mut self, url: impl Into<String>) {
        self.config.endpoint_url = url.into();
        if self.is_polling() {
            self.start();
        }
    }

    /// Toggle mock mode; restarts the schedule while Polling.
    pub fn set_use_mock(&mut self, use_mock: bool) {
        self.config.use_mock = use_mock;
        if self.is_polling() {
            self.start();
        }
    }

    /// Manual tick, independent of the schedule. Does not touch the timer.
    pub fn poll_once(&self) {
        run_tick(&*self.source, &self.config, &self.rules, &self.shared);
    }

    /// Capture everything a renderer needs under one lock.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let state = self.shared.lock().unwrap();
        DashboardSnapshot {
            temperature: state.series.temperature.snapshot(),
            humidity: state.series.humidity.snapshot(),
            soil: state.series.soil.snapshot(),
            light: state.series.light.snapshot(),
            latest: state.latest.clone(),
            advisory: state.advisory.clone(),
            tick_count: state.tick_count,
            polling: self.worker.is_some(),
            use_mock: self.config.use_mock,
            endpoint_url: self.config.endpoint_url.clone(),
            poll_interval: self.config.poll_interval,
            capacity: self.capacity,
        }
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One pipeline pass: fetch → push → evaluate → publish.
fn run_tick(
    source: &dyn SampleSource,
    config: &PollConfig,
    rules: &RuleTable,
    shared: &Mutex<DashboardState>,
) {
    let sample = source.fetch_one(config);
    let advisory = rules.evaluate(&sample.reading);

    let mut state = shared.lock().unwrap();
    state.series.push_reading(&sample.reading);
    state.latest = Some(sample);
    state.advisory = Some(advisory);
    state.tick_count += 1;
}

/// Sleep for `interval` in short slices. Returns true when cancelled.
fn wait_cancellable(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::Relaxed) {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep((deadline - now).min(STOP_CHECK_SLICE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SampleOrigin;
    use std::sync::atomic::AtomicUsize;

    /// Deterministic source: soil climbs by one per fetch.
    struct ScriptedSource {
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn fetch_one(&self, _config: &PollConfig) -> Sample {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
            Sample {
                reading: Reading {
                    temperature: Some(22.0),
                    humidity: Some(55.0),
                    soil: Some(n),
                    light: Some(600.0),
                    ..Default::default()
                },
                origin: SampleOrigin::Mock,
                taken_at_ms: 0,
            }
        }
    }

    fn controller(source: Arc<ScriptedSource>, interval: Duration, capacity: usize) -> PollController {
        let config = PollConfig {
            poll_interval: interval,
            ..Default::default()
        };
        PollController::with_source(source, config, RuleTable::default(), capacity)
    }

    fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn poll_once_runs_the_full_pipeline() {
        let source = Arc::new(ScriptedSource::new());
        let ctl = controller(Arc::clone(&source), Duration::from_secs(3600), 5);

        ctl.poll_once();
        let snap = ctl.snapshot();
        assert_eq!(snap.tick_count, 1);
        assert_eq!(snap.soil.last().copied().flatten(), Some(0.0));
        assert!(snap.advisory.is_some());
        assert!(!snap.polling);
    }

    #[test]
    fn start_polls_immediately_without_waiting_an_interval() {
        let source = Arc::new(ScriptedSource::new());
        let mut ctl = controller(Arc::clone(&source), Duration::from_secs(3600), 5);

        ctl.start();
        assert!(ctl.is_polling());
        assert!(wait_until(Duration::from_secs(1), || {
            ctl.snapshot().tick_count >= 1
        }));
        // Interval is an hour: no second tick should sneak in.
        assert_eq!(ctl.snapshot().tick_count, 1);
        ctl.stop();
        assert!(!ctl.is_polling());
    }

    #[test]
    fn stop_joins_the_worker_and_ticks_cease() {
        let source = Arc::new(ScriptedSource::new());
        let mut ctl = controller(Arc::clone(&source), Duration::from_millis(20), 5);

        ctl.start();
        assert!(wait_until(Duration::from_secs(2), || {
            ctl.snapshot().tick_count >= 3
        }));
        ctl.stop();

        let after_stop = ctl.snapshot().tick_count;
        thread::sleep(Duration::from_millis(100));
        assert_eq!(ctl.snapshot().tick_count, after_stop);
    }

    #[test]
    fn set_interval_while_polling_leaves_exactly_one_worker() {
        let source = Arc::new(ScriptedSource::new());
        let mut ctl = controller(Arc::clone(&source), Duration::from_millis(20), 5);

        ctl.start();
        assert!(wait_until(Duration::from_secs(2), || {
            ctl.snapshot().tick_count >= 3
        }));

        // Stretch the cadence far out. The restart performs one immediate
        // poll; afterwards a leaked 20 ms worker would keep incrementing.
        ctl.set_interval(Duration::from_secs(3600));
        assert!(ctl.is_polling());
        thread::sleep(Duration::from_millis(60));
        let settled = ctl.snapshot().tick_count;
        thread::sleep(Duration::from_millis(300));
        assert_eq!(ctl.snapshot().tick_count, settled);
        assert_eq!(ctl.snapshot().poll_interval, Duration::from_secs(3600));
    }

    #[test]
    fn repeated_start_is_an_idempotent_restart() {
        let source = Arc::new(ScriptedSource::new());
        let mut ctl = controller(Arc::clone(&source), Duration::from_secs(3600), 5);

        ctl.start();
        ctl.start();
        ctl.start();
        // Three restarts, three immediate polls — and exactly one worker,
        // which at this interval produces nothing further.
        assert!(wait_until(Duration::from_secs(1), || {
            ctl.snapshot().tick_count >= 3
        }));
        thread::sleep(Duration::from_millis(150));
        assert_eq!(ctl.snapshot().tick_count, 3);
    }

    #[test]
    fn interval_floor_is_enforced() {
        let source = Arc::new(ScriptedSource::new());
        let mut ctl = controller(source, Duration::from_secs(3600), 5);
        ctl.set_interval(Duration::from_millis(1));
        assert_eq!(ctl.config().poll_interval, MIN_POLL_INTERVAL);
    }

    #[test]
    fn series_hold_the_last_capacity_values_in_order() {
        let source = Arc::new(ScriptedSource::new());
        let ctl = controller(Arc::clone(&source), Duration::from_secs(3600), 3);

        for _ in 0..7 {
            ctl.poll_once();
        }
        let snap = ctl.snapshot();
        assert_eq!(snap.soil, vec![Some(4.0), Some(5.0), Some(6.0)]);
        assert_eq!(snap.series(Metric::Soil).len(), 3);
    }
}
