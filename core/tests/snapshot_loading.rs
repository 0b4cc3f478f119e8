use chrono::{TimeZone, Utc};
use crm_analytics_core::{
    snapshot::DataSnapshot,
    types::{Sentiment, Tier},
    AnalyticsError,
};

#[test]
fn loads_dashboard_json_shape() {
    let json = r#"{
        "customers": [{
            "id": "C-1", "name": "Acme", "tier": "Silver",
            "salesThisMonth": 1200.5, "avg6MoSales": 85000,
            "outstandingBalance": 0, "daysSinceLastOrder": 12
        }],
        "sales": [
            { "id": "S-1", "customerId": "C-1", "amount": 300, "date": "2024-01-15" },
            { "id": "S-2", "customerId": "C-1", "amount": 450, "date": "2024-02-03T10:30:00Z" }
        ],
        "remarks": [
            { "customerId": "C-1", "timestamp": "2024-02-04T08:00:00Z", "sentiment": "positive" },
            { "customerId": "C-1", "timestamp": "2024-02-05T08:00:00Z" }
        ]
    }"#;

    let snapshot = DataSnapshot::from_json_str(json).unwrap();
    assert_eq!(snapshot.customers[0].tier, Tier::Silver);
    assert_eq!(snapshot.customers[0].avg_6mo_sales, 85_000.0);
    assert_eq!(snapshot.sales[1].date.to_string(), "2024-02-03");
    assert_eq!(snapshot.remarks[0].sentiment, Some(Sentiment::Positive));
    assert_eq!(snapshot.remarks[1].sentiment, None);
}

#[test]
fn malformed_sale_date_fails_fast() {
    let json = r#"{ "sales": [
        { "id": "S-1", "customerId": "C-1", "amount": 10, "date": "15/01/2024" }
    ] }"#;
    let err = DataSnapshot::from_json_str(json).unwrap_err();
    assert!(matches!(err, AnalyticsError::Serialization(_)), "got: {err}");
    assert!(err.to_string().contains("15/01/2024"), "got: {err}");
}

/// Remarks take the same date forms as sales.
#[test]
fn remark_with_plain_date_loads_as_midnight_utc() {
    let json = r#"{ "remarks": [
        { "customerId": "C-1", "timestamp": "2024-02-04", "sentiment": "negative" }
    ] }"#;
    let snapshot = DataSnapshot::from_json_str(json).unwrap();
    assert_eq!(
        snapshot.remarks[0].timestamp,
        Utc.with_ymd_and_hms(2024, 2, 4, 0, 0, 0).unwrap()
    );

    let out = serde_json::to_value(&snapshot.remarks[0]).unwrap();
    assert_eq!(out["timestamp"], "2024-02-04T00:00:00Z");
}

#[test]
fn malformed_remark_timestamp_fails_fast() {
    let json = r#"{ "remarks": [ { "customerId": "C-1", "timestamp": "yesterday" } ] }"#;
    let err = DataSnapshot::from_json_str(json).unwrap_err();
    assert!(matches!(err, AnalyticsError::Serialization(_)), "got: {err}");
    assert!(err.to_string().contains("yesterday"), "got: {err}");
}

#[test]
fn negative_sale_amount_fails_fast() {
    let json = r#"{ "sales": [
        { "id": "S-9", "customerId": "C-1", "amount": -10, "date": "2024-01-15" }
    ] }"#;
    let err = DataSnapshot::from_json_str(json).unwrap_err();
    assert!(
        matches!(err, AnalyticsError::NegativeAmount { ref sale_id, .. } if sale_id == "S-9"),
        "got: {err}"
    );
}

#[test]
fn negative_customer_field_fails_fast() {
    let json = r#"{ "customers": [{
        "id": "C-2", "tier": "Dead", "salesThisMonth": -1,
        "avg6MoSales": 0, "outstandingBalance": 0, "daysSinceLastOrder": 0
    }] }"#;
    let err = DataSnapshot::from_json_str(json).unwrap_err();
    assert!(matches!(err, AnalyticsError::NegativeValue { .. }), "got: {err}");
}

#[test]
fn empty_document_is_an_empty_snapshot() {
    let snapshot = DataSnapshot::from_json_str("{}").unwrap();
    assert!(snapshot.customers.is_empty());
    assert!(snapshot.sales.is_empty());
    assert!(snapshot.remarks.is_empty());
}
