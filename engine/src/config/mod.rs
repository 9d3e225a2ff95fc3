pub mod settings;

pub use settings::DashboardSettings;
