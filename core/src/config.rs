//! Engine thresholds.
//!
//! `AnalyticsConfig::default()` is the compiled-in contract the dashboard is
//! built against. A JSON file may override any subset of keys; missing keys
//! keep their defaults.

use serde::{Deserialize, Serialize};

/// One step of a "strictly greater than" ladder. Ladders are listed from the
/// highest cut-off down and the first band the value exceeds wins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBand {
    pub above:  f64,
    pub points: f64,
}

impl ScoreBand {
    pub const fn new(above: f64, points: f64) -> Self {
        Self { above, points }
    }
}

/// Points for the first band `value` strictly exceeds, if any.
pub fn band_points(bands: &[ScoreBand], value: f64) -> Option<f64> {
    bands.iter().find(|b| value > b.above).map(|b| b.points)
}

// ── RFM ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RfmConfig {
    /// Days-since-last-order cut-offs for recency scores 1, 2, 3, 4
    /// (strictly greater). Anything at or below the last cut-off scores 5.
    pub recency_days: [u32; 4],
    /// Order-count floors for frequency scores 5, 4, 3, 2 (inclusive).
    pub frequency_orders: [usize; 4],
    /// Lifetime-spend floors for monetary scores 5, 4, 3, 2 (inclusive).
    pub monetary_spend: [f64; 4],
}

impl Default for RfmConfig {
    fn default() -> Self {
        Self {
            recency_days:     [180, 120, 60, 30],
            frequency_orders: [20, 10, 5, 2],
            monetary_spend:   [500_000.0, 200_000.0, 100_000.0, 50_000.0],
        }
    }
}

// ── Churn ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChurnConfig {
    pub recency_bands:            Vec<ScoreBand>,
    pub sales_drop_bands:         Vec<ScoreBand>,
    pub outstanding_ratio_bands:  Vec<ScoreBand>,
    pub engagement_inactive_days: u32,
    pub engagement_points:        f64,
    pub max_score:                f64,
    pub medium_risk_score:        f64,
    pub high_risk_score:          f64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            recency_bands: vec![
                ScoreBand::new(90.0, 40.0),
                ScoreBand::new(60.0, 30.0),
                ScoreBand::new(30.0, 15.0),
            ],
            sales_drop_bands: vec![
                ScoreBand::new(0.7, 30.0),
                ScoreBand::new(0.4, 15.0),
            ],
            outstanding_ratio_bands: vec![
                ScoreBand::new(2.0, 20.0),
                ScoreBand::new(1.0, 10.0),
            ],
            engagement_inactive_days: 30,
            engagement_points:        10.0,
            max_score:                100.0,
            medium_risk_score:        40.0,
            high_risk_score:          70.0,
        }
    }
}

// ── Opportunities ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpportunityConfig {
    /// Six-month average needed to qualify for Silver.
    pub silver_threshold:   f64,
    pub gold_threshold:     f64,
    pub platinum_threshold: f64,
    /// Fraction of the next threshold at which an upgrade becomes worth chasing.
    pub upgrade_window:     f64,
    pub reactivation_min_avg_sales: f64,
    /// Exclusive bounds on days since last order.
    pub reactivation_min_days: u32,
    pub reactivation_max_days: u32,
    /// Current month below this fraction of the average counts as a dip.
    pub consistency_ratio:  f64,
}

impl Default for OpportunityConfig {
    fn default() -> Self {
        Self {
            silver_threshold:           50_000.0,
            gold_threshold:             100_000.0,
            platinum_threshold:         200_000.0,
            upgrade_window:             0.8,
            reactivation_min_avg_sales: 50_000.0,
            reactivation_min_days:      45,
            reactivation_max_days:      90,
            consistency_ratio:          0.5,
        }
    }
}

// ── Cohorts ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CohortConfig {
    /// Month offsets tracked per cohort, starting at the acquisition month.
    pub window_months: usize,
    /// How many of the newest cohorts are reported.
    pub max_cohorts:   usize,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self { window_months: 12, max_cohorts: 12 }
    }
}

// ── Forecast ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastConfig {
    pub history_months:   usize,
    pub confidence_30d:   f64,
    pub confidence_60d:   f64,
    pub confidence_90d:   f64,
    /// Extra margin per month ahead, as a multiple of the residual std-dev.
    pub margin_growth_per_month: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            history_months:          12,
            confidence_30d:          0.85,
            confidence_60d:          0.75,
            confidence_90d:          0.65,
            margin_growth_per_month: 0.1,
        }
    }
}

// ── Aggregate ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub rfm:         RfmConfig,
    pub churn:       ChurnConfig,
    pub opportunity: OpportunityConfig,
    pub cohort:      CohortConfig,
    pub forecast:    ForecastConfig,
}

impl AnalyticsConfig {
    /// Load overrides from a JSON file. In tests, use `AnalyticsConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(content)?;
        Ok(config)
    }
}
