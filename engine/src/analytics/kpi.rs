use super::{sum_revenue, FilteredView};
use shared::models::KpiSnapshot;

pub fn compute_kpis(view: &FilteredView<'_>) -> KpiSnapshot {
    let total_revenue = sum_revenue(view.iter());
    let transaction_count = view.len();
    let average_ticket = if transaction_count > 0 {
        total_revenue / transaction_count as f64
    } else {
        0.0
    };

    KpiSnapshot {
        total_revenue,
        transaction_count,
        average_ticket,
    }
}
