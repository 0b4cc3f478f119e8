//! Revenue opportunity detector — rule-based upside scan.
//!
//! Three independent rules run per customer; a customer may fire any
//! combination of them. Results across all customers are ranked by
//! potential revenue, largest first.

use crate::{
    config::OpportunityConfig,
    error::AnalyticsResult,
    snapshot::validate_customers,
    types::{Customer, CustomerId, Tier},
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OpportunityType {
    TierUpgrade,
    Reactivation,
    Consistency,
}

impl OpportunityType {
    /// Rule evaluation order.
    pub fn rank(self) -> u8 {
        match self {
            OpportunityType::TierUpgrade  => 0,
            OpportunityType::Reactivation => 1,
            OpportunityType::Consistency  => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub customer_id:       CustomerId,
    pub customer_name:     String,
    #[serde(rename = "type")]
    pub kind:              OpportunityType,
    pub potential_revenue: f64,
    pub difficulty:        Difficulty,
    pub description:       String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tier:       Option<Tier>,
}

/// Largest potential revenue first, then customer id, then rule order.
/// The result does not depend on the order customers were supplied in.
pub fn rank_opportunities(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| {
        b.potential_revenue
            .total_cmp(&a.potential_revenue)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
            .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
    });
}

// ── Detector ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct OpportunityDetector {
    config: OpportunityConfig,
}

impl OpportunityDetector {
    pub fn new(config: OpportunityConfig) -> Self {
        Self { config }
    }

    /// Six-month average that earns `tier`. Dead and Bronze are entry tiers.
    pub fn tier_threshold(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::Silver   => Some(self.config.silver_threshold),
            Tier::Gold     => Some(self.config.gold_threshold),
            Tier::Platinum => Some(self.config.platinum_threshold),
            Tier::Bronze | Tier::Dead => None,
        }
    }

    /// Every opportunity one customer fires, in rule order.
    pub fn detect_for(&self, customer: &Customer) -> AnalyticsResult<Vec<Opportunity>> {
        customer.validate()?;
        Ok(self.evaluate(customer))
    }

    /// All opportunities across `customers`, ranked by `rank_opportunities`.
    pub fn detect(&self, customers: &[Customer]) -> AnalyticsResult<Vec<Opportunity>> {
        validate_customers(customers)?;

        let mut found: Vec<Opportunity> = customers.iter().flat_map(|c| self.evaluate(c)).collect();
        rank_opportunities(&mut found);

        let total: f64 = found.iter().map(|o| o.potential_revenue).sum();
        log::debug!(
            "opportunities: {} found across {} customers (potential={total:.0})",
            found.len(),
            customers.len(),
        );
        Ok(found)
    }

    fn evaluate(&self, customer: &Customer) -> Vec<Opportunity> {
        [
            self.tier_upgrade(customer),
            self.reactivation(customer),
            self.consistency(customer),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn tier_upgrade(&self, customer: &Customer) -> Option<Opportunity> {
        let target = customer.tier.next()?;
        let threshold = self.tier_threshold(target)?;
        let avg = customer.avg_6mo_sales;

        if avg < threshold * self.config.upgrade_window || avg >= threshold {
            return None;
        }

        let gap = threshold - avg;
        Some(Opportunity {
            customer_id:       customer.id.clone(),
            customer_name:     customer.display_name().to_string(),
            kind:              OpportunityType::TierUpgrade,
            potential_revenue: gap,
            difficulty:        Difficulty::Low,
            description:       format!(
                "{:.0} more in average monthly sales moves {} from {} to {}",
                gap, customer.display_name(), customer.tier, target,
            ),
            target_tier:       Some(target),
        })
    }

    fn reactivation(&self, customer: &Customer) -> Option<Opportunity> {
        let cfg = &self.config;
        let days = customer.days_since_last_order;
        let fires = customer.avg_6mo_sales > cfg.reactivation_min_avg_sales
            && customer.sales_this_month == 0.0
            && days > cfg.reactivation_min_days
            && days < cfg.reactivation_max_days;
        if !fires {
            return None;
        }

        Some(Opportunity {
            customer_id:       customer.id.clone(),
            customer_name:     customer.display_name().to_string(),
            kind:              OpportunityType::Reactivation,
            potential_revenue: customer.avg_6mo_sales,
            difficulty:        Difficulty::Medium,
            description:       format!(
                "{} has not ordered in {days} days; usual month is {:.0}",
                customer.display_name(), customer.avg_6mo_sales,
            ),
            target_tier:       None,
        })
    }

    fn consistency(&self, customer: &Customer) -> Option<Opportunity> {
        let this_month = customer.sales_this_month;
        let avg = customer.avg_6mo_sales;
        if this_month <= 0.0 || this_month >= avg * self.config.consistency_ratio {
            return None;
        }

        Some(Opportunity {
            customer_id:       customer.id.clone(),
            customer_name:     customer.display_name().to_string(),
            kind:              OpportunityType::Consistency,
            potential_revenue: avg - this_month,
            difficulty:        Difficulty::Low,
            description:       format!(
                "{} is at {:.0} this month against a {:.0} average",
                customer.display_name(), this_month, avg,
            ),
            target_tier:       None,
        })
    }
}
