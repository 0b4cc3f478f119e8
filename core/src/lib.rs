//! Customer analytics engine for the CRM dashboard.
//!
//! Pure, deterministic transforms from customer, sale and remark records
//! into RFM segments, churn risk, revenue opportunities, cohort retention
//! and short-term revenue forecasts. No I/O beyond optional JSON loading.

pub mod churn_scorer;
pub mod clock;
pub mod cohort_engine;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast_engine;
pub mod opportunity_detector;
pub mod rfm_scorer;
pub mod segmentation;
pub mod snapshot;
pub mod types;

pub use engine::{AnalyticsEngine, CustomerInsight, DashboardReport};
pub use error::{AnalyticsError, AnalyticsResult};
