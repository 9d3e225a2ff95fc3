// Dashboard settings, loaded from an optional JSON file. Every field has a
// default, so a partial file only overrides what it names.
use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardSettings {
    pub data_file: PathBuf,
    pub logo_file: PathBuf,
    pub logo_width: u32,
    /// How many payment methods are surfaced as featured KPIs.
    pub featured_payment_methods: usize,
    pub export_file_name: String,
    /// chrono formats tried in order for the `Data` column.
    pub date_formats: Vec<String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        DashboardSettings {
            data_file: PathBuf::from("vendas.csv"),
            logo_file: PathBuf::from("logo.png"),
            logo_width: 250,
            featured_payment_methods: 3,
            export_file_name: "vendas_filtradas.csv".to_string(),
            // Slash dates are month first. `%.f` also accepts no fraction.
            date_formats: [
                "%Y-%m-%d",
                "%m/%d/%Y",
                "%Y/%m/%d",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        }
    }
}

impl DashboardSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read settings '{}': {}", path.display(), e))
        })?;
        let settings: DashboardSettings = serde_json::from_str(&raw).map_err(|e| {
            DashboardError::Config(format!("Invalid settings '{}': {}", path.display(), e))
        })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "Loaded dashboard settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(DashboardError::Config("date_formats must not be empty".to_string()));
        }
        Ok(())
    }
}
