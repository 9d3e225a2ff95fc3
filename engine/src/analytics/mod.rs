// Aggregations over a filtered view of the dataset. Everything here is pure:
// fresh values are derived on every call, nothing is cached.
pub mod filter;
pub mod grouping;
pub mod kpi;

pub use filter::{filter_transactions, FilteredView};
pub use grouping::{payment_breakdown, totals_by_city};
pub use kpi::compute_kpis;

use shared::models::Transaction;

// A record's contribution to a sum. Missing and NaN totals are skipped,
// matching the usual skip-missing convention of dataframe sums.
pub(crate) fn revenue(transaction: &Transaction) -> Option<f64> {
    transaction.total.filter(|v| !v.is_nan())
}

// Starts from +0.0 so that an empty sum never prints as "-0,00".
pub(crate) fn sum_revenue<'a>(records: impl Iterator<Item = &'a Transaction>) -> f64 {
    records.filter_map(revenue).fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use shared::models::Transaction;

    pub fn tx(date: &str, city: &str, channel: &str, payment: &str, total: Option<f64>) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Transaction {
            date,
            city: city.to_string(),
            channel: channel.to_string(),
            payment_method: payment.to_string(),
            total,
            month_key: Transaction::month_key_for(date),
            extra: Vec::new(),
        }
    }

    pub fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }
}
