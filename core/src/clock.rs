//! Report clock — owns the "as of" date and calendar-month arithmetic.
//!
//! Nothing in the engine reads the wall clock directly. Callers pick the
//! reference date once per report so every trailing window agrees.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportClock {
    pub as_of: NaiveDate,
}

impl ReportClock {
    pub fn fixed(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn today() -> Self {
        Self { as_of: Utc::now().date_naive() }
    }

    /// The `n` calendar months ending with the as-of month, oldest first.
    pub fn trailing_months(&self, n: usize) -> Vec<MonthKey> {
        let current = MonthKey::of(self.as_of);
        (0..n).rev().map(|back| current.minus(back as i32)).collect()
    }
}

/// A calendar month. Orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year:  i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    fn ordinal(self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    fn from_ordinal(ordinal: i32) -> Self {
        Self {
            year:  ordinal.div_euclid(12),
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn minus(self, months: i32) -> Self {
        Self::from_ordinal(self.ordinal() - months)
    }

    /// Whole calendar months from `self` to `later`; negative when `later`
    /// is earlier. Day-of-month is ignored.
    pub fn months_until(self, later: MonthKey) -> i32 {
        later.ordinal() - self.ordinal()
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `YYYY-MM` for the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    MonthKey::of(date).to_string()
}

/// Calendar months between the months of two dates.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    MonthKey::of(from).months_until(MonthKey::of(to))
}
