use super::{revenue, FilteredView};
use shared::models::{GroupTotal, PaymentBreakdown, PaymentShare, RevenueStatus, Transaction};
use shared::utils::brazilian_format::{format_currency, format_percent};
use std::collections::BTreeMap;

const NO_REVENUE_PERCENT_LABEL: &str = "0%";

// Sums revenue per key. Groups come out in lexical key order so that the
// stable descending sort below breaks ties deterministically.
fn group_sums<'a, F>(view: &FilteredView<'a>, key: F) -> Vec<GroupTotal>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for transaction in view.iter() {
        let entry = groups.entry(key(transaction)).or_insert((0.0, 0));
        if let Some(value) = revenue(transaction) {
            entry.0 += value;
        }
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(name, (total, count))| GroupTotal {
            name: name.to_string(),
            total,
            count,
        })
        .collect()
}

fn sort_descending<T>(items: &mut [T], total: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| total(b).total_cmp(&total(a)));
}

// Ties go to the even digit: 0.25 -> 0.2, 0.35 -> 0.4.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Revenue per city, non-increasing by total.
pub fn totals_by_city(view: &FilteredView<'_>) -> Vec<GroupTotal> {
    let mut cities = group_sums(view, |t| t.city.as_str());
    sort_descending(&mut cities, |g| g.total);
    cities
}

/// Revenue per payment method with each method's share of the grand total.
///
/// Non-finite sums are coerced to zero first. When the grand total is not
/// positive the breakdown is flagged [`RevenueStatus::NoRevenue`], every
/// percentage is zero and nothing is featured. Otherwise the first
/// `featured` methods (or fewer) are surfaced as featured entries.
pub fn payment_breakdown(view: &FilteredView<'_>, featured: usize) -> PaymentBreakdown {
    let mut methods = group_sums(view, |t| t.payment_method.as_str());
    for method in &mut methods {
        if !method.total.is_finite() {
            tracing::warn!(method = %method.name, "Non-finite payment total, using 0");
            method.total = 0.0;
        }
    }
    sort_descending(&mut methods, |g| g.total);

    let grand_total = methods.iter().fold(0.0, |acc, g| acc + g.total);

    if grand_total <= 0.0 {
        let shares = methods
            .into_iter()
            .map(|g| PaymentShare {
                total_label: format_currency(g.total),
                percent_label: NO_REVENUE_PERCENT_LABEL.to_string(),
                method: g.name,
                total: g.total,
                count: g.count,
                percent: 0.0,
            })
            .collect();
        return PaymentBreakdown {
            status: RevenueStatus::NoRevenue,
            grand_total,
            shares,
            featured: Vec::new(),
        };
    }

    let shares: Vec<PaymentShare> = methods
        .into_iter()
        .map(|g| {
            let percent = round_one_decimal(g.total / grand_total * 100.0);
            PaymentShare {
                total_label: format_currency(g.total),
                percent_label: format_percent(percent),
                method: g.name,
                total: g.total,
                count: g.count,
                percent,
            }
        })
        .collect();
    let featured = shares.iter().take(featured).cloned().collect();

    PaymentBreakdown {
        status: RevenueStatus::HasRevenue,
        grand_total,
        shares,
        featured,
    }
}
