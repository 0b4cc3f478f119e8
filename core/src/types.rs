//! Input records shared across every engine component.
//!
//! These arrive already materialized from the persistence layer and are
//! read-only to the engine. Field names serialize in camelCase to match the
//! dashboard's JSON shape.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Stable customer identifier as issued by the datastore.
pub type CustomerId = String;

/// Sale identifier as issued by the datastore.
pub type SaleId = String;

// ── Tier ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Dead,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Platinum => "Platinum",
            Tier::Gold     => "Gold",
            Tier::Silver   => "Silver",
            Tier::Bronze   => "Bronze",
            Tier::Dead     => "Dead",
        }
    }

    /// The tier a customer graduates into, if any. Dead customers re-enter at
    /// Silver, same as Bronze.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Dead | Tier::Bronze => Some(Tier::Silver),
            Tier::Silver              => Some(Tier::Gold),
            Tier::Gold                => Some(Tier::Platinum),
            Tier::Platinum            => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Customer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id:                   CustomerId,
    #[serde(default)]
    pub name:                 String,
    pub tier:                 Tier,
    pub sales_this_month:     f64,
    #[serde(rename = "avg6MoSales")]
    pub avg_6mo_sales:        f64,
    pub outstanding_balance:  f64,
    pub days_since_last_order: u32,
}

impl Customer {
    /// Name for display, falling back to the id when the datastore left it blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }

    /// Rejects negative or non-finite money fields. Zero is fine everywhere.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let fields = [
            ("salesThisMonth",     self.sales_this_month),
            ("avg6MoSales",        self.avg_6mo_sales),
            ("outstandingBalance", self.outstanding_balance),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AnalyticsError::NonFiniteValue {
                    context: format!("customer {}", self.id),
                    field:   field.into(),
                });
            }
            if value < 0.0 {
                return Err(AnalyticsError::NegativeValue {
                    customer_id: self.id.clone(),
                    field:       field.into(),
                    value,
                });
            }
        }
        Ok(())
    }
}

// ── Sale ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id:          SaleId,
    pub customer_id: CustomerId,
    pub amount:      f64,
    #[serde(with = "sale_date")]
    pub date:        NaiveDate,
}

impl Sale {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.amount.is_finite() {
            return Err(AnalyticsError::NonFiniteValue {
                context: format!("sale {}", self.id),
                field:   "amount".into(),
            });
        }
        if self.amount < 0.0 {
            return Err(AnalyticsError::NegativeAmount {
                sale_id: self.id.clone(),
                amount:  self.amount,
            });
        }
        Ok(())
    }
}

/// Parses a sale date as stored by the datastore: either a bare calendar date
/// (`2024-01-15`) or a full RFC 3339 timestamp, which is truncated to its UTC
/// calendar date.
pub fn parse_sale_date(raw: &str) -> AnalyticsResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| AnalyticsError::InvalidDate { value: raw.to_string() })
}

mod sale_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_sale_date(&raw).map_err(D::Error::custom)
    }
}

// ── Remark ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Remark {
    pub customer_id: CustomerId,
    /// RFC 3339 or a bare `YYYY-MM-DD`, read as midnight UTC.
    #[serde(with = "remark_timestamp")]
    pub timestamp:   DateTime<Utc>,
    #[serde(default)]
    pub sentiment:   Option<Sentiment>,
}

/// Parses a remark timestamp. Accepts the same two forms as sale dates; a bare
/// calendar date becomes midnight UTC.
pub fn parse_remark_timestamp(raw: &str) -> AnalyticsResult<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .map_err(|_| AnalyticsError::InvalidDate { value: raw.to_string() })
}

mod remark_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_remark_timestamp(&raw).map_err(D::Error::custom)
    }
}
