//! Rule-based cultivation advice.
//!
//! The rule table is declarative data consumed by a single evaluation
//! loop: each rule names a metric, a value band, a condition class, and a
//! tip. Thresholds and messages are tunable (a table can be loaded from
//! JSON) without touching control flow.
//!
//! Convention: `Good` bands classify a metric for display but contribute
//! no tips. The headline is the first triggered tip in table order, or a
//! fixed all-nominal sentence when nothing triggered.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::reading::{Metric, Reading};

/// Headline shown when no rule produced a tip.
pub const NOMINAL_HEADLINE: &str = "All sensors nominal.";

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// A value band on one metric's axis.
///
/// Two range flavors exist because the default table mixes boundary
/// semantics: soil bands are half-open (`[30, 45)` is Watch, 45 itself is
/// Good) while the ideal temperature band includes both ends (`[18, 28]`,
/// 28 itself is Good).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Band {
    /// `value < limit`
    Below { limit: f64 },
    /// `lo <= value < hi`
    Span { lo: f64, hi: f64 },
    /// `lo <= value <= hi`
    Closed { lo: f64, hi: f64 },
    /// `value >= limit`
    AtLeast { limit: f64 },
    /// `value > limit`
    Above { limit: f64 },
}

impl Band {
    /// Whether `value` falls inside this band.
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Below { limit } => value < limit,
            Self::Span { lo, hi } => value >= lo && value < hi,
            Self::Closed { lo, hi } => value >= lo && value <= hi,
            Self::AtLeast { limit } => value >= limit,
            Self::Above { limit } => value > limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// How a matched band classifies its metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// In range; no action needed.
    Good,
    /// Borderline; worth keeping an eye on.
    Watch,
    /// Out of range; the tip asks for action.
    Alert,
}

/// One row of the advice table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRule {
    pub metric: Metric,
    pub band: Band,
    pub condition: Condition,
    pub tip: String,
}

impl AdviceRule {
    fn new(metric: Metric, band: Band, condition: Condition, tip: &str) -> Self {
        Self {
            metric,
            band,
            condition,
            tip: tip.to_string(),
        }
    }
}

/// Error loading a rule table from disk.
#[derive(Debug)]
pub enum RuleTableError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A table with no rules would advise on nothing.
    Empty,
}

impl fmt::Display for RuleTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read rule table: {e}"),
            Self::Parse(e) => write!(f, "cannot parse rule table: {e}"),
            Self::Empty => write!(f, "rule table contains no rules"),
        }
    }
}

impl std::error::Error for RuleTableError {}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// An ordered advice table, evaluated top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<AdviceRule>,
}

impl Default for RuleTable {
    /// The stock grow-room table.
    fn default() -> Self {
        use Band::*;
        use Condition::*;
        use Metric::*;
        Self {
            rules: vec![
                AdviceRule::new(
                    Soil,
                    Below { limit: 30.0 },
                    Alert,
                    "Soil too dry — consider watering soon.",
                ),
                AdviceRule::new(
                    Soil,
                    Span { lo: 30.0, hi: 45.0 },
                    Watch,
                    "Soil moisture moderate — monitor for changes.",
                ),
                AdviceRule::new(
                    Soil,
                    AtLeast { limit: 45.0 },
                    Good,
                    "Soil moisture healthy.",
                ),
                AdviceRule::new(
                    Temperature,
                    Below { limit: 18.0 },
                    Alert,
                    "Temperature low — provide gentle heat or move to a warmer zone.",
                ),
                AdviceRule::new(
                    Temperature,
                    Closed { lo: 18.0, hi: 28.0 },
                    Good,
                    "Temperature within ideal range.",
                ),
                AdviceRule::new(
                    Temperature,
                    Above { limit: 28.0 },
                    Alert,
                    "Temperature high — increase ventilation or shade.",
                ),
                AdviceRule::new(
                    Humidity,
                    Below { limit: 40.0 },
                    Alert,
                    "Humidity low — consider misting or a humidifier.",
                ),
                AdviceRule::new(
                    Humidity,
                    Above { limit: 80.0 },
                    Alert,
                    "Humidity high — risk of fungal growth; improve airflow.",
                ),
                AdviceRule::new(
                    Light,
                    Below { limit: 150.0 },
                    Alert,
                    "Light low — increase exposure or turn on grow lights.",
                ),
                AdviceRule::new(
                    Light,
                    Above { limit: 1200.0 },
                    Alert,
                    "High light levels — ensure plants tolerate strong light or provide shading.",
                ),
            ],
        }
    }
}

impl RuleTable {
    /// Load a table from a JSON file (an array of rules).
    pub fn load(path: &Path) -> Result<Self, RuleTableError> {
        let text = std::fs::read_to_string(path).map_err(RuleTableError::Io)?;
        let table: Self = serde_json::from_str(&text).map_err(RuleTableError::Parse)?;
        if table.rules.is_empty() {
            return Err(RuleTableError::Empty);
        }
        Ok(table)
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[AdviceRule] {
        &self.rules
    }

    /// Evaluate a reading against the table.
    ///
    /// Pure: the same reading always yields the same result. Metrics the
    /// reading does not carry match no band and stay unclassified.
    pub fn evaluate(&self, reading: &Reading) -> AdvisoryResult {
        let mut tips: Vec<String> = Vec::new();
        let mut conditions: BTreeMap<Metric, Condition> = BTreeMap::new();

        for rule in &self.rules {
            let Some(value) = reading.metric(rule.metric) else {
                continue;
            };
            if !rule.band.contains(value) {
                continue;
            }
            // First matching band wins the metric's classification.
            conditions.entry(rule.metric).or_insert(rule.condition);
            if rule.condition != Condition::Good && !tips.contains(&rule.tip) {
                tips.push(rule.tip.clone());
            }
        }

        let headline = tips
            .first()
            .cloned()
            .unwrap_or_else(|| NOMINAL_HEADLINE.to_string());

        AdvisoryResult {
            headline,
            tips,
            conditions,
        }
    }
}

// ---------------------------------------------------------------------------
// AdvisoryResult
// ---------------------------------------------------------------------------

/// Outcome of one evaluation: a headline, the full tip list in triggering
/// order (de-duplicated; renderers may cap how many they show), and a
/// per-metric classification for coloring readouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub headline: String,
    pub tips: Vec<String>,
    pub conditions: BTreeMap<Metric, Condition>,
}

impl AdvisoryResult {
    /// Classification of one metric, if any band matched it.
    pub fn condition(&self, metric: Metric) -> Option<Condition> {
        self.conditions.get(&metric).copied()
    }

    /// True when the reading triggered no tips at all.
    pub fn is_nominal(&self) -> bool {
        self.tips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, humidity: f64, soil: f64, light: f64) -> Reading {
        Reading {
            temperature: Some(temperature),
            humidity: Some(humidity),
            soil: Some(soil),
            light: Some(light),
            ..Default::default()
        }
    }

    #[test]
    fn evaluate_is_pure() {
        let table = RuleTable::default();
        let r = reading(32.0, 35.0, 20.0, 100.0);
        assert_eq!(table.evaluate(&r), table.evaluate(&r));
    }

    #[test]
    fn stressed_reading_triggers_four_unique_tips() {
        let table = RuleTable::default();
        let result = table.evaluate(&reading(32.0, 35.0, 20.0, 100.0));

        assert_eq!(result.headline, "Soil too dry — consider watering soon.");
        assert_eq!(result.tips.len(), 4);
        let mut deduped = result.tips.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), 4);
        assert_eq!(result.condition(Metric::Soil), Some(Condition::Alert));
        assert_eq!(result.condition(Metric::Temperature), Some(Condition::Alert));
    }

    #[test]
    fn nominal_reading_has_no_tips() {
        let table = RuleTable::default();
        let result = table.evaluate(&reading(22.0, 55.0, 60.0, 600.0));

        assert_eq!(result.headline, NOMINAL_HEADLINE);
        assert!(result.is_nominal());
        assert_eq!(result.condition(Metric::Soil), Some(Condition::Good));
        assert_eq!(result.condition(Metric::Humidity), None);
    }

    #[test]
    fn soil_boundary_at_30_is_moderate_not_dry() {
        let table = RuleTable::default();
        let result = table.evaluate(&reading(22.0, 55.0, 30.0, 600.0));

        assert_eq!(
            result.headline,
            "Soil moisture moderate — monitor for changes.",
        );
        assert_eq!(result.condition(Metric::Soil), Some(Condition::Watch));
    }

    #[test]
    fn soil_boundary_at_45_is_healthy() {
        let table = RuleTable::default();
        let result = table.evaluate(&reading(22.0, 55.0, 45.0, 600.0));
        assert_eq!(result.condition(Metric::Soil), Some(Condition::Good));
        assert!(result.is_nominal());
    }

    #[test]
    fn temperature_boundary_at_28_is_still_ideal() {
        let table = RuleTable::default();
        assert!(table.evaluate(&reading(28.0, 55.0, 60.0, 600.0)).is_nominal());
        assert!(!table.evaluate(&reading(28.1, 55.0, 60.0, 600.0)).is_nominal());
    }

    #[test]
    fn missing_metric_matches_no_band() {
        let table = RuleTable::default();
        let partial = Reading {
            soil: Some(20.0),
            ..Default::default()
        };
        let result = table.evaluate(&partial);
        assert_eq!(result.tips.len(), 1);
        assert_eq!(result.condition(Metric::Temperature), None);
    }

    #[test]
    fn table_round_trips_through_json() {
        let table = RuleTable::default();
        let json = serde_json::to_string_pretty(&table).unwrap();
        let back: RuleTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }

    #[test]
    fn custom_thresholds_change_verdicts() {
        // The second observed dashboard used a 500 lx low-light threshold.
        let table: RuleTable = serde_json::from_str(
            r#"[{"metric":"light","band":{"kind":"below","limit":500.0},
                 "condition":"alert","tip":"Light low."}]"#,
        )
        .unwrap();
        assert!(!table.evaluate(&reading(22.0, 55.0, 60.0, 300.0)).is_nominal());
        assert!(table.evaluate(&reading(22.0, 55.0, 60.0, 600.0)).is_nominal());
    }
}
