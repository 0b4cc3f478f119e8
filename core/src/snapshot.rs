//! Input snapshot — the customer, sale and remark arrays one report is built from.
//!
//! The persistence layer owns fetching; this type only holds what it handed
//! over. Every derived result is a pure function of one snapshot.

use crate::{
    error::AnalyticsResult,
    types::{Customer, Remark, Sale},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataSnapshot {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub sales:     Vec<Sale>,
    #[serde(default)]
    pub remarks:   Vec<Remark>,
}

impl DataSnapshot {
    pub fn new(customers: Vec<Customer>, sales: Vec<Sale>, remarks: Vec<Remark>) -> Self {
        Self { customers, sales, remarks }
    }

    pub fn from_json_str(content: &str) -> AnalyticsResult<Self> {
        let snapshot: DataSnapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_json_file(path: &str) -> AnalyticsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_customers(&self.customers)?;
        validate_sales(&self.sales)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    /// FNV-1a over the canonical JSON encoding. Two snapshots with the same
    /// records in the same order hash the same; any edit changes the value.
    pub fn content_fingerprint(&self) -> AnalyticsResult<u64> {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME:  u64 = 0x0000_0100_0000_01b3;

        let bytes = serde_json::to_vec(self)?;
        Ok(bytes.iter().fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME)))
    }
}

pub fn validate_customers(customers: &[Customer]) -> AnalyticsResult<()> {
    customers.iter().try_for_each(Customer::validate)
}

pub fn validate_sales(sales: &[Sale]) -> AnalyticsResult<()> {
    sales.iter().try_for_each(Sale::validate)
}

// ── Sales index ──────────────────────────────────────────────────────────────

/// Sales grouped by customer id, built once per pass so per-customer work
/// stays linear in the number of sales.
#[derive(Debug, Default)]
pub struct SalesIndex<'a> {
    by_customer: HashMap<&'a str, Vec<&'a Sale>>,
}

impl<'a> SalesIndex<'a> {
    pub fn build(sales: &'a [Sale]) -> Self {
        let mut by_customer: HashMap<&'a str, Vec<&'a Sale>> = HashMap::new();
        for sale in sales {
            by_customer.entry(sale.customer_id.as_str()).or_default().push(sale);
        }
        Self { by_customer }
    }

    pub fn for_customer(&self, customer_id: &str) -> &[&'a Sale] {
        self.by_customer
            .get(customer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
