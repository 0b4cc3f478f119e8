use crm_analytics_core::{
    opportunity_detector::{rank_opportunities, Difficulty, Opportunity, OpportunityDetector, OpportunityType},
    types::{Customer, Tier},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn make_customer(id: &str, tier: Tier, this_month: f64, avg: f64, days: u32) -> Customer {
    Customer {
        id:                    id.into(),
        name:                  format!("Customer {id}"),
        tier,
        sales_this_month:      this_month,
        avg_6mo_sales:         avg,
        outstanding_balance:   0.0,
        days_since_last_order: days,
    }
}

fn kinds(detector: &OpportunityDetector, customer: &Customer) -> Vec<OpportunityType> {
    detector
        .detect_for(customer)
        .unwrap()
        .into_iter()
        .map(|o| o.kind)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Silver at 85k is within [80k, 100k) of Gold: upgrade worth 15k.
#[test]
fn silver_near_gold_fires_tier_upgrade() {
    let detector = OpportunityDetector::default();
    let customer = make_customer("s1", Tier::Silver, 85_000.0, 85_000.0, 5);

    let found = detector.detect_for(&customer).unwrap();
    let upgrade = found
        .iter()
        .find(|o| o.kind == OpportunityType::TierUpgrade)
        .expect("tier upgrade should fire");
    assert_eq!(upgrade.potential_revenue, 15_000.0);
    assert_eq!(upgrade.difficulty, Difficulty::Low);
    assert_eq!(upgrade.target_tier, Some(Tier::Gold));
}

/// Silver at 45k is below 0.8 × 100k: no upgrade.
#[test]
fn silver_far_from_gold_does_not_fire() {
    let detector = OpportunityDetector::default();
    let customer = make_customer("s2", Tier::Silver, 45_000.0, 45_000.0, 5);
    assert!(!kinds(&detector, &customer).contains(&OpportunityType::TierUpgrade));
}

#[test]
fn upgrade_window_bounds() {
    let detector = OpportunityDetector::default();
    // Lower bound is inclusive.
    let at_floor = make_customer("b1", Tier::Bronze, 40_000.0, 40_000.0, 5);
    assert!(kinds(&detector, &at_floor).contains(&OpportunityType::TierUpgrade));
    // Reaching the threshold means the upgrade is already earned.
    let at_threshold = make_customer("b2", Tier::Bronze, 50_000.0, 50_000.0, 5);
    assert!(!kinds(&detector, &at_threshold).contains(&OpportunityType::TierUpgrade));
    // Dead customers climb toward Silver too.
    let dead = make_customer("d1", Tier::Dead, 45_000.0, 45_000.0, 5);
    assert!(kinds(&detector, &dead).contains(&OpportunityType::TierUpgrade));
    // Gold aims at Platinum (200k).
    let gold = make_customer("g1", Tier::Gold, 170_000.0, 170_000.0, 5);
    let found = detector.detect_for(&gold).unwrap();
    assert_eq!(found[0].target_tier, Some(Tier::Platinum));
    assert_eq!(found[0].potential_revenue, 30_000.0);
    // Platinum has nowhere to go.
    let platinum = make_customer("p1", Tier::Platinum, 190_000.0, 190_000.0, 5);
    assert!(kinds(&detector, &platinum).is_empty());
}

/// 60k average, nothing this month, 50 days quiet: reactivation worth 60k at Medium.
#[test]
fn lapsed_big_account_fires_reactivation() {
    let detector = OpportunityDetector::default();
    let customer = make_customer("r1", Tier::Gold, 0.0, 60_000.0, 50);

    let found = detector.detect_for(&customer).unwrap();
    let reactivation = found
        .iter()
        .find(|o| o.kind == OpportunityType::Reactivation)
        .expect("reactivation should fire");
    assert_eq!(reactivation.potential_revenue, 60_000.0);
    assert_eq!(reactivation.difficulty, Difficulty::Medium);
}

#[test]
fn reactivation_day_window_is_exclusive() {
    let detector = OpportunityDetector::default();
    for days in [45, 90] {
        let customer = make_customer("r2", Tier::Gold, 0.0, 60_000.0, days);
        assert!(
            !kinds(&detector, &customer).contains(&OpportunityType::Reactivation),
            "days={days} must not fire reactivation"
        );
    }
}

/// A customer can fire several rules at once.
#[test]
fn rules_are_not_mutually_exclusive() {
    let detector = OpportunityDetector::default();
    // Silver, 90k average (upgrade), 20k this month (< 45k: consistency).
    let customer = make_customer("m1", Tier::Silver, 20_000.0, 90_000.0, 10);
    let found = kinds(&detector, &customer);
    assert_eq!(found, vec![OpportunityType::TierUpgrade, OpportunityType::Consistency]);
}

#[test]
fn consistency_needs_some_sales_this_month() {
    let detector = OpportunityDetector::default();
    let zero = make_customer("z1", Tier::Bronze, 0.0, 10_000.0, 10);
    assert!(!kinds(&detector, &zero).contains(&OpportunityType::Consistency));
    let dip = make_customer("z2", Tier::Bronze, 4_000.0, 10_000.0, 10);
    let found = detector.detect_for(&dip).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].potential_revenue, 6_000.0);
}

/// Combined output is ranked by potential revenue and never negative.
#[test]
fn detect_ranks_by_potential_revenue() {
    let detector = OpportunityDetector::default();
    let customers = vec![
        make_customer("a", Tier::Bronze, 4_000.0, 10_000.0, 10),    // consistency 6k
        make_customer("b", Tier::Gold, 0.0, 60_000.0, 50),          // reactivation 60k
        make_customer("c", Tier::Silver, 85_000.0, 85_000.0, 5),    // upgrade 15k
        make_customer("d", Tier::Platinum, 300_000.0, 250_000.0, 1), // nothing
    ];

    let found = detector.detect(&customers).unwrap();
    let amounts: Vec<f64> = found.iter().map(|o| o.potential_revenue).collect();
    assert_eq!(amounts, vec![60_000.0, 15_000.0, 6_000.0]);
    assert!(found.iter().all(|o| o.potential_revenue >= 0.0));
}

#[test]
fn opportunity_type_serializes_kebab_case() {
    let json = serde_json::to_value(OpportunityType::TierUpgrade).unwrap();
    assert_eq!(json, "tier-upgrade");
}

/// Equal amounts rank by customer id, so input order never shows through.
#[test]
fn equal_amounts_rank_by_customer_id() {
    let detector = OpportunityDetector::default();
    let a = make_customer("A", Tier::Silver, 85_000.0, 85_000.0, 5);
    let b = make_customer("B", Tier::Silver, 85_000.0, 85_000.0, 5);

    let ids = |found: Vec<Opportunity>| -> Vec<String> {
        found.into_iter().map(|o| o.customer_id).collect()
    };
    let forward = ids(detector.detect(&[a.clone(), b.clone()]).unwrap());
    let reversed = ids(detector.detect(&[b, a]).unwrap());

    assert_eq!(forward, vec!["A", "B"]);
    assert_eq!(forward, reversed, "ranking must not depend on customer order");
}

/// Same customer, same amount: rule order decides.
#[test]
fn equal_amounts_for_one_customer_follow_rule_order() {
    let make = |kind: OpportunityType| Opportunity {
        customer_id:       "X".into(),
        customer_name:     "X".into(),
        kind,
        potential_revenue: 1_000.0,
        difficulty:        Difficulty::Low,
        description:       String::new(),
        target_tier:       None,
    };
    let mut found = vec![
        make(OpportunityType::Consistency),
        make(OpportunityType::TierUpgrade),
        make(OpportunityType::Reactivation),
    ];

    rank_opportunities(&mut found);
    let kinds: Vec<OpportunityType> = found.iter().map(|o| o.kind).collect();
    assert_eq!(
        kinds,
        vec![OpportunityType::TierUpgrade, OpportunityType::Reactivation, OpportunityType::Consistency]
    );
}
