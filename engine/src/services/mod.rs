pub mod dashboard_service;

pub use dashboard_service::{default_selection, DashboardSession, DashboardView, KpiLabels};
