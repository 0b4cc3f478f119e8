//! The analytics engine — one entry point over every component.
//!
//! COMPONENTS (independent, each reads only the snapshot):
//!   1. RFM scorer + segmentation
//!   2. Churn risk scorer
//!   3. Revenue opportunity detector
//!   4. Cohort engine
//!   5. Forecast engine
//!
//! RULES:
//!   - No component reads another component's output, except segmentation
//!     classifying RFM triples.
//!   - Nothing is cached. Every call recomputes from the snapshot it is given.
//!   - Output is identical regardless of the order components run in.

use crate::{
    churn_scorer::{engagement_summary, ChurnRisk, ChurnScorer, EngagementSummary, RiskLevel},
    clock::ReportClock,
    cohort_engine::{CohortEngine, CohortRow},
    config::AnalyticsConfig,
    error::{AnalyticsError, AnalyticsResult},
    forecast_engine::{ForecastEngine, ForecastResult},
    opportunity_detector::{rank_opportunities, Opportunity, OpportunityDetector},
    rfm_scorer::{RfmScore, RfmScorer},
    segmentation::{classify_score, Segment, SegmentKind, Segmenter},
    snapshot::DataSnapshot,
    types::Customer,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub generated_for:        NaiveDate,
    pub snapshot_fingerprint: String,
    pub customer_count:       usize,
    pub segments:             Vec<Segment>,
    pub churn_risks:          Vec<ChurnRisk>,
    pub at_risk:              Vec<ChurnRisk>,
    pub opportunities:        Vec<Opportunity>,
    pub cohorts:              Vec<CohortRow>,
    pub forecast:             ForecastResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInsight {
    pub customer:      Customer,
    pub rfm:           RfmScore,
    pub segment:       SegmentKind,
    pub segment_name:  String,
    pub churn:         ChurnRisk,
    pub opportunities: Vec<Opportunity>,
    pub engagement:    EngagementSummary,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    rfm:           RfmScorer,
    segmenter:     Segmenter,
    churn:         ChurnScorer,
    opportunities: OpportunityDetector,
    cohorts:       CohortEngine,
    forecast:      ForecastEngine,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            rfm:           RfmScorer::new(config.rfm.clone()),
            segmenter:     Segmenter::new(config.rfm),
            churn:         ChurnScorer::new(config.churn),
            opportunities: OpportunityDetector::new(config.opportunity),
            cohorts:       CohortEngine::new(config.cohort),
            forecast:      ForecastEngine::new(config.forecast),
        }
    }

    /// Every dashboard panel for one snapshot.
    pub fn dashboard(&self, snapshot: &DataSnapshot, clock: &ReportClock) -> AnalyticsResult<DashboardReport> {
        snapshot.validate()?;
        let DataSnapshot { customers, sales, remarks } = snapshot;

        let segments      = self.segmenter.segment(customers, sales)?;
        let churn_risks   = self.churn.score_all(customers, remarks)?;
        let opportunities = self.opportunities.detect(customers)?;
        let cohorts       = self.cohorts.build(customers, sales)?;
        let forecast      = self.forecast.forecast(sales, clock)?;

        let at_risk: Vec<ChurnRisk> = churn_risks
            .iter()
            .filter(|r| r.level >= RiskLevel::Medium)
            .cloned()
            .collect();

        log::info!(
            "dashboard: as_of={} customers={} segments={} at_risk={} opportunities={} cohorts={}",
            clock.as_of,
            customers.len(),
            segments.len(),
            at_risk.len(),
            opportunities.len(),
            cohorts.len(),
        );

        Ok(DashboardReport {
            generated_for:        clock.as_of,
            snapshot_fingerprint: format!("{:016x}", snapshot.content_fingerprint()?),
            customer_count:       customers.len(),
            segments,
            churn_risks,
            at_risk,
            opportunities,
            cohorts,
            forecast,
        })
    }

    /// Everything the engine knows about one customer.
    pub fn customer_insight(&self, snapshot: &DataSnapshot, customer_id: &str) -> AnalyticsResult<CustomerInsight> {
        let customer = snapshot
            .customer(customer_id)
            .ok_or_else(|| AnalyticsError::CustomerNotFound { customer_id: customer_id.to_string() })?;

        let rfm = self.rfm.score(customer, &snapshot.sales)?;
        let segment = classify_score(&rfm);
        let churn = self.churn.score(customer, &snapshot.remarks)?;
        let mut opportunities = self.opportunities.detect_for(customer)?;
        rank_opportunities(&mut opportunities);

        log::debug!(
            "insight: {customer_id} rfm={:?} segment={} churn={:.0}",
            rfm.triple(),
            segment.name(),
            churn.score,
        );

        Ok(CustomerInsight {
            customer: customer.clone(),
            rfm,
            segment,
            segment_name: segment.name().to_string(),
            churn,
            opportunities,
            engagement: engagement_summary(customer_id, &snapshot.remarks),
        })
    }
}
