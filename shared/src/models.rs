use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One sales transaction as read from the source CSV.
///
/// `month_key` is derived from `date` at load time (`"{month}/{year}"`, no
/// zero padding). `extra` holds the values of every non-core source column,
/// in source order, so an export can reproduce the source file layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub city: String,
    pub channel: String,
    pub payment_method: String,
    /// `None` when the source cell was empty or not a number.
    pub total: Option<f64>,
    pub month_key: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Transaction {
    pub fn month_key_for(date: NaiveDate) -> String {
        use chrono::Datelike;
        format!("{}/{}", date.month(), date.year())
    }
}

/// The user's current filter: one month-key and a set of channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub month: String,
    pub channels: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<I, S>(month: impl Into<String>, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            month: month.into(),
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }

    /// Replaces the month when one is given, and the channel set when the
    /// list is non-empty. Otherwise keeps the current value.
    pub fn with_overrides(mut self, month: Option<String>, channels: Vec<String>) -> Self {
        if let Some(month) = month {
            self.month = month;
        }
        if !channels.is_empty() {
            self.channels = channels.into_iter().collect();
        }
        self
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.month_key == self.month && self.channels.contains(&transaction.channel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub total_revenue: f64,
    pub transaction_count: usize,
    /// Zero when `transaction_count` is zero.
    pub average_ticket: f64,
}

/// Summed revenue for one category value (a city, a payment method).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentShare {
    pub method: String,
    pub total: f64,
    pub count: usize,
    /// Share of the grand total, rounded to one decimal place.
    pub percent: f64,
    pub total_label: String,
    pub percent_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueStatus {
    HasRevenue,
    /// Grand total was zero or negative; every percentage is reported as 0.
    NoRevenue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub status: RevenueStatus,
    pub grand_total: f64,
    /// All methods, non-increasing by total.
    pub shares: Vec<PaymentShare>,
    /// Leading entries of `shares` surfaced as highlighted KPIs. Empty when
    /// `status` is `NoRevenue`.
    pub featured: Vec<PaymentShare>,
}

impl PaymentBreakdown {
    pub fn has_revenue(&self) -> bool {
        self.status == RevenueStatus::HasRevenue
    }
}
