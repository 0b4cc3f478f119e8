//! RFM scorer — recency, frequency and monetary value on a 1–5 scale.
//!
//! Recency comes from the customer record; frequency and monetary value
//! come from that customer's sales. Every bracket uses an inclusive lower
//! bound except recency, which counts days strictly past each cut-off.

use crate::{
    config::RfmConfig,
    error::AnalyticsResult,
    snapshot::{validate_customers, validate_sales, SalesIndex},
    types::{Customer, CustomerId, Sale},
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RfmScore {
    pub customer_id:           CustomerId,
    pub recency:               u8,
    pub frequency:             u8,
    pub monetary:              u8,
    // Raw inputs
    pub days_since_last_order: u32,
    pub order_count:           usize,
    pub total_spend:           f64,
}

impl RfmScore {
    pub fn triple(&self) -> (u8, u8, u8) {
        (self.recency, self.frequency, self.monetary)
    }
}

// ── Scorer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RfmScorer {
    config: RfmConfig,
}

impl RfmScorer {
    pub fn new(config: RfmConfig) -> Self {
        Self { config }
    }

    pub fn recency_score(&self, days_since_last_order: u32) -> u8 {
        let [d1, d2, d3, d4] = self.config.recency_days;
        match days_since_last_order {
            d if d > d1 => 1,
            d if d > d2 => 2,
            d if d > d3 => 3,
            d if d > d4 => 4,
            _ => 5,
        }
    }

    pub fn frequency_score(&self, order_count: usize) -> u8 {
        let [f5, f4, f3, f2] = self.config.frequency_orders;
        match order_count {
            n if n >= f5 => 5,
            n if n >= f4 => 4,
            n if n >= f3 => 3,
            n if n >= f2 => 2,
            _ => 1,
        }
    }

    pub fn monetary_score(&self, total_spend: f64) -> u8 {
        let [m5, m4, m3, m2] = self.config.monetary_spend;
        match total_spend {
            s if s >= m5 => 5,
            s if s >= m4 => 4,
            s if s >= m3 => 3,
            s if s >= m2 => 2,
            _ => 1,
        }
    }

    /// Scores one customer against the full sales array.
    pub fn score(&self, customer: &Customer, sales: &[Sale]) -> AnalyticsResult<RfmScore> {
        customer.validate()?;
        let mine: Vec<&Sale> = sales.iter().filter(|s| s.customer_id == customer.id).collect();
        for sale in &mine {
            sale.validate()?;
        }
        Ok(self.score_from(customer, &mine))
    }

    /// Scores every customer, in input order.
    pub fn score_all(&self, customers: &[Customer], sales: &[Sale]) -> AnalyticsResult<Vec<RfmScore>> {
        validate_customers(customers)?;
        validate_sales(sales)?;

        let index = SalesIndex::build(sales);
        let scores: Vec<RfmScore> = customers
            .iter()
            .map(|c| self.score_from(c, index.for_customer(&c.id)))
            .collect();

        log::debug!("rfm: scored {} customers over {} sales", scores.len(), sales.len());
        Ok(scores)
    }

    fn score_from(&self, customer: &Customer, sales: &[&Sale]) -> RfmScore {
        let order_count = sales.len();
        let total_spend: f64 = sales.iter().map(|s| s.amount).sum();

        RfmScore {
            customer_id:           customer.id.clone(),
            recency:               self.recency_score(customer.days_since_last_order),
            frequency:             self.frequency_score(order_count),
            monetary:              self.monetary_score(total_spend),
            days_since_last_order: customer.days_since_last_order,
            order_count,
            total_spend,
        }
    }
}
