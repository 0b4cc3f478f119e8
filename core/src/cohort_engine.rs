//! Cohort engine — retention and ARPU by first-purchase month.
//!
//! A customer's cohort is the calendar month of their earliest sale.
//! Customers without sales belong to no cohort. Each cohort tracks a fixed
//! window of month offsets; offset 0 is the acquisition month, so it always
//! contains the acquisition sale and retention there is always 100.

use crate::{
    clock::MonthKey,
    config::CohortConfig,
    error::AnalyticsResult,
    snapshot::{validate_sales, SalesIndex},
    types::{Customer, Sale},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CohortRow {
    /// `YYYY-MM`
    pub cohort_month: String,
    pub size:         usize,
    /// Percent of the cohort with a sale at each month offset.
    pub retention:    Vec<f64>,
    /// Revenue per cohort member at each month offset.
    pub revenue:      Vec<f64>,
}

struct CohortAccumulator<'a> {
    size:    usize,
    active:  Vec<HashSet<&'a str>>,
    revenue: Vec<f64>,
}

impl<'a> CohortAccumulator<'a> {
    fn new(window: usize) -> Self {
        Self {
            size:    0,
            active:  vec![HashSet::new(); window],
            revenue: vec![0.0; window],
        }
    }

    fn into_row(self, month: MonthKey) -> CohortRow {
        let size = self.size as f64;
        CohortRow {
            cohort_month: month.to_string(),
            size:         self.size,
            retention:    self.active.iter().map(|a| a.len() as f64 / size * 100.0).collect(),
            revenue:      self.revenue.iter().map(|r| r / size).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CohortEngine {
    config: CohortConfig,
}

impl CohortEngine {
    pub fn new(config: CohortConfig) -> Self {
        Self { config }
    }

    /// Newest cohorts first, at most `max_cohorts` of them.
    pub fn build(&self, customers: &[Customer], sales: &[Sale]) -> AnalyticsResult<Vec<CohortRow>> {
        validate_sales(sales)?;

        let window = self.config.window_months;
        let index = SalesIndex::build(sales);
        let mut cohorts: BTreeMap<MonthKey, CohortAccumulator> = BTreeMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for customer in customers {
            let id = customer.id.as_str();
            if !seen.insert(id) {
                continue;
            }
            let history = index.for_customer(id);
            let Some(first) = history.iter().map(|s| s.date).min() else {
                continue;
            };

            let acquired = MonthKey::of(first);
            let cohort = cohorts
                .entry(acquired)
                .or_insert_with(|| CohortAccumulator::new(window));
            cohort.size += 1;

            for sale in history {
                let offset = acquired.months_until(MonthKey::of(sale.date));
                if offset < 0 || offset as usize >= window {
                    continue;
                }
                cohort.active[offset as usize].insert(id);
                cohort.revenue[offset as usize] += sale.amount;
            }
        }

        let orphaned = sales.iter().filter(|s| !seen.contains(s.customer_id.as_str())).count();
        if orphaned > 0 {
            log::warn!("cohorts: skipped {orphaned} sales with no matching customer");
        }

        let rows: Vec<CohortRow> = cohorts
            .into_iter()
            .rev()
            .take(self.config.max_cohorts)
            .map(|(month, acc)| acc.into_row(month))
            .collect();

        log::debug!("cohorts: {} cohorts over {} customers", rows.len(), seen.len());
        Ok(rows)
    }
}
