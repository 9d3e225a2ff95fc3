// Engine library root: load -> filter -> aggregate -> present.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod presentation;
pub mod services;

pub use error::{DashboardError, Result};
