//! Segmentation — maps RFM triples onto eight named segments.
//!
//! RULE: rules are evaluated top-down and the first match wins. Later rules
//! may overlap earlier ones; they are only reached when nothing above matched.
//! `Lost` is the fallback and has no rule of its own.

use crate::{
    config::RfmConfig,
    error::AnalyticsResult,
    rfm_scorer::{RfmScore, RfmScorer},
    types::{Customer, Sale},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    Champions,
    Loyal,
    PotentialLoyalist,
    AtRisk,
    NeedsAttention,
    AboutToSleep,
    Hibernating,
    Lost,
}

impl SegmentKind {
    /// Priority order; also the order segments are reported in.
    pub const ALL: [SegmentKind; 8] = [
        SegmentKind::Champions,
        SegmentKind::Loyal,
        SegmentKind::PotentialLoyalist,
        SegmentKind::AtRisk,
        SegmentKind::NeedsAttention,
        SegmentKind::AboutToSleep,
        SegmentKind::Hibernating,
        SegmentKind::Lost,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SegmentKind::Champions         => "champions",
            SegmentKind::Loyal             => "loyal",
            SegmentKind::PotentialLoyalist => "potential-loyalist",
            SegmentKind::AtRisk            => "at-risk",
            SegmentKind::NeedsAttention    => "needs-attention",
            SegmentKind::AboutToSleep      => "about-to-sleep",
            SegmentKind::Hibernating       => "hibernating",
            SegmentKind::Lost              => "lost",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Champions         => "Champions",
            SegmentKind::Loyal             => "Loyal",
            SegmentKind::PotentialLoyalist => "Potential Loyalist",
            SegmentKind::AtRisk            => "At Risk",
            SegmentKind::NeedsAttention    => "Needs Attention",
            SegmentKind::AboutToSleep      => "About to Sleep",
            SegmentKind::Hibernating       => "Hibernating",
            SegmentKind::Lost              => "Lost",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SegmentKind::Champions         => "Ordered recently, order often and spend the most",
            SegmentKind::Loyal             => "Steady buyers with solid spend",
            SegmentKind::PotentialLoyalist => "Recent, valuable buyers who do not order often yet",
            SegmentKind::AtRisk            => "Used to buy often and spend well, but not lately",
            SegmentKind::NeedsAttention    => "Middling recency, frequency and spend",
            SegmentKind::AboutToSleep      => "Low, fading activity",
            SegmentKind::Hibernating       => "Long gone but once ordered repeatedly",
            SegmentKind::Lost              => "Lowest recency with little history",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            SegmentKind::Champions         => "Reward and ask for referrals",
            SegmentKind::Loyal             => "Upsell higher-value lines",
            SegmentKind::PotentialLoyalist => "Offer a loyalty programme",
            SegmentKind::AtRisk            => "Call personally before they leave",
            SegmentKind::NeedsAttention    => "Send a limited-time offer",
            SegmentKind::AboutToSleep      => "Share relevant new products",
            SegmentKind::Hibernating       => "Run a win-back campaign",
            SegmentKind::Lost              => "Low-cost reactivation only",
        }
    }
}

type Rule = fn(u8, u8, u8) -> bool;

/// Ordered (segment, predicate) pairs over (R, F, M).
const RULES: [(SegmentKind, Rule); 7] = [
    (SegmentKind::Champions,         |r, f, m| r >= 4 && f >= 4 && m >= 4),
    (SegmentKind::Loyal,             |r, f, m| r >= 3 && f >= 3 && m >= 3),
    (SegmentKind::PotentialLoyalist, |r, f, m| r >= 4 && f <= 2 && m >= 3),
    (SegmentKind::AtRisk,            |r, f, m| r == 2 && f >= 3 && m >= 3),
    (SegmentKind::NeedsAttention,    |r, f, m| r == 2 && f == 2 && m >= 2),
    (SegmentKind::AboutToSleep,      |r, f, m| r == 2 && f <= 2 && m <= 2),
    (SegmentKind::Hibernating,       |r, f, _| r == 1 && f >= 2),
];

/// Single pass over the ordered rules.
pub fn classify(recency: u8, frequency: u8, monetary: u8) -> SegmentKind {
    RULES
        .iter()
        .find(|(_, rule)| rule(recency, frequency, monetary))
        .map(|(kind, _)| *kind)
        .unwrap_or(SegmentKind::Lost)
}

pub fn classify_score(score: &RfmScore) -> SegmentKind {
    classify(score.recency, score.frequency, score.monetary)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id:            String,
    pub name:          String,
    pub description:   String,
    pub action:        String,
    pub customers:     Vec<Customer>,
    /// Sum of members' `salesThisMonth`.
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    scorer: RfmScorer,
}

impl Segmenter {
    pub fn new(config: RfmConfig) -> Self {
        Self { scorer: RfmScorer::new(config) }
    }

    /// Partitions `customers` into non-empty segments in priority order.
    pub fn segment(&self, customers: &[Customer], sales: &[Sale]) -> AnalyticsResult<Vec<Segment>> {
        let scores = self.scorer.score_all(customers, sales)?;

        let mut members: HashMap<SegmentKind, Vec<Customer>> = HashMap::new();
        for (customer, score) in customers.iter().zip(&scores) {
            members.entry(classify_score(score)).or_default().push(customer.clone());
        }

        let segments: Vec<Segment> = SegmentKind::ALL
            .iter()
            .filter_map(|kind| {
                let customers = members.remove(kind)?;
                let total_revenue = customers.iter().map(|c| c.sales_this_month).sum();
                Some(Segment {
                    id:          kind.id().into(),
                    name:        kind.name().into(),
                    description: kind.description().into(),
                    action:      kind.action().into(),
                    customers,
                    total_revenue,
                })
            })
            .collect();

        log::debug!(
            "segmentation: {} customers into {} segments",
            customers.len(),
            segments.len(),
        );
        Ok(segments)
    }
}
