use chrono::NaiveDate;
use crm_analytics_core::{
    rfm_scorer::RfmScorer,
    segmentation::{SegmentKind, Segmenter},
    types::{Customer, Sale, Tier},
};
use std::collections::HashSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_customer(id: &str, days_since_last_order: u32, sales_this_month: f64) -> Customer {
    Customer {
        id:                    id.into(),
        name:                  format!("Customer {id}"),
        tier:                  Tier::Silver,
        sales_this_month,
        avg_6mo_sales:         0.0,
        outstanding_balance:   0.0,
        days_since_last_order,
    }
}

/// `count` equal sales for one customer, one per day from 2024-01-01.
fn sales_for(customer_id: &str, count: usize, each: f64) -> Vec<Sale> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| Sale {
            id:          format!("{customer_id}-s{i}"),
            customer_id: customer_id.into(),
            amount:      each,
            date:        start + chrono::Duration::days(i as i64),
        })
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Only the target customer's sales count toward frequency and monetary.
#[test]
fn rfm_filters_sales_by_customer() {
    let scorer = RfmScorer::default();
    let alice = make_customer("alice", 10, 0.0);

    let mut sales = sales_for("alice", 10, 25_000.0); // 10 orders, 250k
    sales.extend(sales_for("bob", 30, 100_000.0));

    let score = scorer.score(&alice, &sales).unwrap();
    assert_eq!(score.order_count, 10);
    assert_eq!(score.total_spend, 250_000.0);
    assert_eq!(score.triple(), (5, 4, 4));
}

#[test]
fn customer_without_sales_scores_lowest_frequency_and_monetary() {
    let scorer = RfmScorer::default();
    let score = scorer.score(&make_customer("quiet", 200, 0.0), &[]).unwrap();
    assert_eq!(score.triple(), (1, 1, 1));
}

/// Every customer lands in exactly one segment and none are dropped.
#[test]
fn segmentation_partitions_customers() {
    let customers = vec![
        make_customer("champ", 5, 10_000.0),
        make_customer("loyal", 90, 5_000.0),
        make_customer("risk", 150, 2_000.0),
        make_customer("hib", 365, 0.0),
        make_customer("lost", 365, 0.0),
        make_customer("fresh", 3, 1_000.0),
    ];
    let mut sales = Vec::new();
    sales.extend(sales_for("champ", 25, 30_000.0)); // F5 M5
    sales.extend(sales_for("loyal", 6, 20_000.0));  // F3 M3
    sales.extend(sales_for("risk", 12, 20_000.0));  // F4 M4
    sales.extend(sales_for("hib", 3, 1_000.0));     // F2 M1

    let segments = Segmenter::default().segment(&customers, &sales).unwrap();

    let total: usize = segments.iter().map(|s| s.customers.len()).sum();
    assert_eq!(total, customers.len(), "Segment sizes must sum to customer count");

    let mut seen = HashSet::new();
    for seg in &segments {
        assert!(!seg.customers.is_empty(), "Empty segment '{}' must not be emitted", seg.name);
        for c in &seg.customers {
            assert!(seen.insert(c.id.clone()), "Customer {} appears in two segments", c.id);
        }
    }

    let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Champions", "Loyal", "At Risk", "Hibernating", "Lost"]);
}

/// Segment revenue sums salesThisMonth, not lifetime spend.
#[test]
fn segment_revenue_uses_sales_this_month() {
    let customers = vec![make_customer("a", 5, 1_200.0), make_customer("b", 5, 800.0)];
    let mut sales = sales_for("a", 25, 30_000.0);
    sales.extend(sales_for("b", 25, 30_000.0));

    let segments = Segmenter::default().segment(&customers, &sales).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].id, SegmentKind::Champions.id());
    assert_eq!(segments[0].total_revenue, 2_000.0);
}

#[test]
fn empty_customer_list_yields_no_segments() {
    let segments = Segmenter::default().segment(&[], &[]).unwrap();
    assert!(segments.is_empty());
}
