//! Churn risk scorer — additive multi-factor retention model.
//!
//! This scorer:
//!   1. Adds capped points for recency, sales trend, outstanding balance and engagement
//!   2. Records a readable factor for every component that fired, in evaluation order
//!   3. Caps the sum and maps it onto Low / Medium / High
//!
//! Trend and outstanding components divide by the six-month average. When that
//! average is zero they simply do not fire.

use crate::{
    config::{band_points, ChurnConfig},
    error::AnalyticsResult,
    snapshot::validate_customers,
    types::{Customer, CustomerId, Remark, Sentiment},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChurnRisk {
    pub customer_id:           CustomerId,
    pub score:                 f64,
    pub level:                 RiskLevel,
    pub factors:               Vec<String>,
    // Components
    pub recency_component:     f64,
    pub trend_component:       f64,
    pub outstanding_component: f64,
    pub engagement_component:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub customer_id:    CustomerId,
    pub remark_count:   usize,
    pub positive:       usize,
    pub neutral:        usize,
    pub negative:       usize,
    pub unspecified:    usize,
    pub last_remark_at: Option<DateTime<Utc>>,
}

// ── Scorer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ChurnScorer {
    config: ChurnConfig,
}

impl ChurnScorer {
    pub fn new(config: ChurnConfig) -> Self {
        Self { config }
    }

    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.config.high_risk_score {
            RiskLevel::High
        } else if score >= self.config.medium_risk_score {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Scores one customer. `remarks` may hold everyone's remarks.
    pub fn score(&self, customer: &Customer, remarks: &[Remark]) -> AnalyticsResult<ChurnRisk> {
        customer.validate()?;
        let has_remarks = remarks.iter().any(|r| r.customer_id == customer.id);
        Ok(self.compute(customer, has_remarks))
    }

    /// Scores every customer, highest risk first. Ties keep customer-id order.
    pub fn score_all(&self, customers: &[Customer], remarks: &[Remark]) -> AnalyticsResult<Vec<ChurnRisk>> {
        validate_customers(customers)?;

        let engaged: HashSet<&str> = remarks.iter().map(|r| r.customer_id.as_str()).collect();
        let mut risks: Vec<ChurnRisk> = customers
            .iter()
            .map(|c| self.compute(c, engaged.contains(c.id.as_str())))
            .collect();

        risks.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.customer_id.cmp(&b.customer_id))
        });

        let high = risks.iter().filter(|r| r.level == RiskLevel::High).count();
        log::debug!("churn: scored {} customers, {high} high risk", risks.len());
        Ok(risks)
    }

    /// Customers at or above `min_level`, highest risk first.
    pub fn at_risk(
        &self,
        customers: &[Customer],
        remarks: &[Remark],
        min_level: RiskLevel,
    ) -> AnalyticsResult<Vec<ChurnRisk>> {
        let mut risks = self.score_all(customers, remarks)?;
        risks.retain(|r| r.level >= min_level);
        Ok(risks)
    }

    fn compute(&self, customer: &Customer, has_remarks: bool) -> ChurnRisk {
        let cfg = &self.config;
        let days = customer.days_since_last_order;
        let avg = customer.avg_6mo_sales;
        let mut factors = Vec::new();

        // Recency
        let recency_component = match band_points(&cfg.recency_bands, f64::from(days)) {
            Some(points) => {
                factors.push(format!("Inactive for {days} days"));
                points
            }
            None => 0.0,
        };

        // Sales trend
        let mut trend_component = 0.0;
        if avg > 0.0 {
            let drop = (avg - customer.sales_this_month) / avg;
            if let Some(points) = band_points(&cfg.sales_drop_bands, drop) {
                factors.push(format!("Sales down {:.0}% vs 6-month average", drop * 100.0));
                trend_component = points;
            }
        }

        // Outstanding balance
        let mut outstanding_component = 0.0;
        if avg > 0.0 {
            let ratio = customer.outstanding_balance / avg;
            if let Some(points) = band_points(&cfg.outstanding_ratio_bands, ratio) {
                factors.push(format!("Outstanding balance {ratio:.1}x monthly average"));
                outstanding_component = points;
            }
        }

        // Engagement
        let engagement_component = if !has_remarks && days > cfg.engagement_inactive_days {
            factors.push("No recorded engagement".to_string());
            cfg.engagement_points
        } else {
            0.0
        };

        let score = (recency_component + trend_component + outstanding_component + engagement_component)
            .min(cfg.max_score);

        ChurnRisk {
            customer_id: customer.id.clone(),
            score,
            level: self.level_for(score),
            factors,
            recency_component,
            trend_component,
            outstanding_component,
            engagement_component,
        }
    }
}

/// Remark volume and sentiment mix for one customer. Informational only;
/// sentiment never feeds the churn score.
pub fn engagement_summary(customer_id: &str, remarks: &[Remark]) -> EngagementSummary {
    let mut summary = EngagementSummary {
        customer_id:    customer_id.to_string(),
        remark_count:   0,
        positive:       0,
        neutral:        0,
        negative:       0,
        unspecified:    0,
        last_remark_at: None,
    };

    for remark in remarks.iter().filter(|r| r.customer_id == customer_id) {
        summary.remark_count += 1;
        match remark.sentiment {
            Some(Sentiment::Positive) => summary.positive += 1,
            Some(Sentiment::Neutral)  => summary.neutral += 1,
            Some(Sentiment::Negative) => summary.negative += 1,
            None                      => summary.unspecified += 1,
        }
        summary.last_remark_at = summary.last_remark_at.max(Some(remark.timestamp));
    }

    summary
}
