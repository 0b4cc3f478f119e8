//! Forecast engine — linear revenue trend over trailing calendar months.
//!
//! Monthly totals (oldest first, the as-of month last) are fitted with
//! ordinary least squares and the line is projected one, two and three
//! months ahead. Projections never go below zero. Range width comes from
//! the residual standard deviation and widens with each month ahead.
//!
//! Confidence per horizon is a fixed configured constant; it is not derived
//! from the residuals.

use crate::{
    clock::{MonthKey, ReportClock},
    config::ForecastConfig,
    error::AnalyticsResult,
    snapshot::validate_sales,
    types::Sale,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HorizonForecast {
    pub predicted:  f64,
    pub confidence: f64,
    pub range:      [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRevenue {
    pub month:   String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub next_30_days: HorizonForecast,
    pub next_60_days: HorizonForecast,
    pub next_90_days: HorizonForecast,
    pub trend:        Trend,
    /// Percent change of the projected next three months over the last three.
    pub growth_rate:  f64,
    pub slope:        f64,
    pub intercept:    f64,
    pub history:      Vec<MonthlyRevenue>,
}

/// `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope:     f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Least-squares fit over `(i, ys[i])`. Fewer than two points gives a
    /// flat line through the mean (or zero).
    pub fn ordinary_least_squares(ys: &[f64]) -> Self {
        let n = ys.len() as f64;
        if ys.len() < 2 {
            return Self { slope: 0.0, intercept: ys.first().copied().unwrap_or(0.0) };
        }

        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
        for (i, y) in ys.iter().enumerate() {
            let x = i as f64;
            sum_x  += x;
            sum_y  += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
        let intercept = (sum_y - slope * sum_x) / n;
        Self { slope, intercept }
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Mean squared residual of `ys` against the line.
    pub fn residual_variance(&self, ys: &[f64]) -> f64 {
        if ys.is_empty() {
            return 0.0;
        }
        let sse: f64 = ys
            .iter()
            .enumerate()
            .map(|(i, y)| (y - self.at(i as f64)).powi(2))
            .sum();
        sse / ys.len() as f64
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Totals per trailing month, oldest first. Sales outside the window are ignored.
    pub fn monthly_totals(&self, sales: &[Sale], clock: &ReportClock) -> Vec<MonthlyRevenue> {
        let months = clock.trailing_months(self.config.history_months);
        let slot: HashMap<MonthKey, usize> = months.iter().enumerate().map(|(i, m)| (*m, i)).collect();

        let mut totals = vec![0.0; months.len()];
        for sale in sales {
            if let Some(i) = slot.get(&MonthKey::of(sale.date)) {
                totals[*i] += sale.amount;
            }
        }

        months
            .iter()
            .zip(totals)
            .map(|(month, revenue)| MonthlyRevenue { month: month.to_string(), revenue })
            .collect()
    }

    pub fn forecast(&self, sales: &[Sale], clock: &ReportClock) -> AnalyticsResult<ForecastResult> {
        validate_sales(sales)?;

        let history = self.monthly_totals(sales, clock);
        let ys: Vec<f64> = history.iter().map(|m| m.revenue).collect();
        let fit = LinearFit::ordinary_least_squares(&ys);
        let std_dev = fit.residual_variance(&ys).sqrt();

        let n = ys.len();
        let predict = |x: usize| fit.at(x as f64).max(0.0);
        let month_1 = predict(n);
        let month_2 = predict(n + 1);
        let month_3 = predict(n + 2);

        let horizon = |predicted: f64, months_ahead: u32, confidence: f64| {
            let margin = std_dev * (1.0 + self.config.margin_growth_per_month * f64::from(months_ahead));
            HorizonForecast {
                predicted,
                confidence,
                range: [(predicted - margin).max(0.0), predicted + margin],
            }
        };

        let projected = month_1 + month_2 + month_3;
        let recent: f64 = ys.iter().rev().take(3).sum();
        let growth_rate = if recent > 0.0 {
            (projected - recent) / recent * 100.0
        } else {
            0.0
        };

        let trend = if fit.slope > 0.0 {
            Trend::Up
        } else if fit.slope < 0.0 {
            Trend::Down
        } else {
            Trend::Stable
        };

        log::debug!(
            "forecast: slope={:.2} intercept={:.2} std_dev={std_dev:.2} next30={month_1:.0}",
            fit.slope,
            fit.intercept,
        );

        Ok(ForecastResult {
            next_30_days: horizon(month_1, 1, self.config.confidence_30d),
            next_60_days: horizon(month_1 + month_2, 2, self.config.confidence_60d),
            next_90_days: horizon(projected, 3, self.config.confidence_90d),
            trend,
            growth_rate,
            slope: fit.slope,
            intercept: fit.intercept,
            history,
        })
    }
}
