//! Sale filters shared by listings, analytics and exports.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::SaleRecord;

/// Selects sale records by date range and customer.
///
/// Both date bounds are inclusive. The customer match is a case-insensitive
/// substring of `customer_name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleFilter {
    #[ts(as = "Option<String>")]
    pub from: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub to: Option<DateTime<Utc>>,
    pub customer: Option<String>,
}

impl SaleFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            customer: None,
        }
    }

    /// Whole calendar days: from the start of `from` to the end of `to`.
    pub fn for_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from: from.map(start_of_day),
            to: to.map(end_of_day),
            customer: None,
        }
    }

    /// The calendar day containing `now`.
    pub fn today(now: DateTime<Utc>) -> Self {
        let day = now.date_naive();
        Self::between(start_of_day(day), end_of_day(day))
    }

    /// Today plus the `days - 1` days before it. Zero is treated as one.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Self {
        let today = now.date_naive();
        let back = i64::from(days.max(1) - 1);
        let first = today - Duration::days(back);
        Self::between(start_of_day(first), end_of_day(today))
    }

    /// The calendar month containing `now`.
    pub fn this_month(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let first = today - Duration::days(i64::from(today.day0()));
        let last = first
            .checked_add_months(Months::new(1))
            .map(|next| next - Duration::days(1))
            .unwrap_or(today);
        Self::between(start_of_day(first), end_of_day(last))
    }

    pub fn with_customer(mut self, customer: impl Into<String>) -> Self {
        let customer = customer.into();
        self.customer = if customer.trim().is_empty() {
            None
        } else {
            Some(customer)
        };
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        if let Some(from) = self.from {
            if record.sale_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.sale_date > to {
                return false;
            }
        }
        if let Some(customer) = &self.customer {
            let needle = customer.trim().to_lowercase();
            if !record.customer_name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    /// Report period text: `All Time`, or the bounds as `dd/mm/yyyy`.
    pub fn period_label(&self) -> String {
        let fmt = |d: &DateTime<Utc>| d.format("%d/%m/%Y").to_string();
        match (&self.from, &self.to) {
            (None, None) => "All Time".to_string(),
            (Some(from), Some(to)) => format!("{} to {}", fmt(from), fmt(to)),
            (Some(from), None) => format!("From {}", fmt(from)),
            (None, Some(to)) => format!("Until {}", fmt(to)),
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    start_of_day(day) + Duration::days(1) - Duration::nanoseconds(1)
}
