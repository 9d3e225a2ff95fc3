use crate::analytics::{compute_kpis, filter_transactions, payment_breakdown, totals_by_city, FilteredView};
use crate::config::DashboardSettings;
use crate::data::{load_optional_asset, BrazilianCsvWriter, Dataset, DatasetCache, OptionalAsset};
use crate::error::Result;
use serde::Serialize;
use shared::models::{FilterSelection, GroupTotal, KpiSnapshot, PaymentBreakdown};
use shared::utils::brazilian_format::format_currency;
use std::path::Path;
use std::sync::Arc;

/// KPI values as they are shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiLabels {
    pub total_revenue: String,
    pub transaction_count: String,
    pub average_ticket: String,
}

impl From<&KpiSnapshot> for KpiLabels {
    fn from(kpis: &KpiSnapshot) -> Self {
        KpiLabels {
            total_revenue: format_currency(kpis.total_revenue),
            transaction_count: kpis.transaction_count.to_string(),
            average_ticket: format_currency(kpis.average_ticket),
        }
    }
}

/// Everything a presentation back end needs for one selection. Rebuilt from
/// scratch on every selection change.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub month_keys: &'a [String],
    pub channels: &'a [String],
    pub selection: FilterSelection,
    pub kpis: KpiSnapshot,
    pub kpi_labels: KpiLabels,
    pub city_totals: Vec<GroupTotal>,
    pub payments: PaymentBreakdown,
    pub records: FilteredView<'a>,
    pub export_file_name: &'a str,
    pub export_csv: String,
    pub logo: &'a OptionalAsset,
}

impl DashboardView<'_> {
    /// Writes the export text (same format as the source CSV) to `path`.
    pub fn write_export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.export_csv)?;
        tracing::info!(path = %path.display(), rows = self.records.len(), "Exported filtered data");
        Ok(())
    }
}

pub struct DashboardSession {
    dataset: Arc<Dataset>,
    settings: DashboardSettings,
    logo: OptionalAsset,
}

impl DashboardSession {
    pub fn new(dataset: Arc<Dataset>, settings: DashboardSettings, logo: OptionalAsset) -> Self {
        DashboardSession { dataset, settings, logo }
    }

    /// Loads the configured data file through `cache` and the branding asset.
    pub fn open(cache: &mut DatasetCache, settings: DashboardSettings) -> Result<Self> {
        let dataset = cache.get_or_load(&settings.data_file)?;
        let logo = load_optional_asset(&settings.logo_file, settings.logo_width);
        tracing::info!(
            path = %settings.data_file.display(),
            rows = dataset.len(),
            logo = logo.is_present(),
            "Dashboard session ready"
        );
        Ok(Self::new(dataset, settings, logo))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// First month-key and every channel, as the filter widgets start out.
    pub fn default_selection(&self) -> FilterSelection {
        default_selection(&self.dataset)
    }

    pub fn view(&self, selection: &FilterSelection) -> Result<DashboardView<'_>> {
        let records = filter_transactions(self.dataset.transactions(), selection);
        let kpis = compute_kpis(&records);
        let city_totals = totals_by_city(&records);
        let payments = payment_breakdown(&records, self.settings.featured_payment_methods);
        let export_csv = BrazilianCsvWriter::to_string(self.dataset.layout(), records.records())?;

        tracing::debug!(
            month = %selection.month,
            rows = records.len(),
            revenue = kpis.total_revenue,
            "Recomputed dashboard view"
        );

        Ok(DashboardView {
            month_keys: self.dataset.month_keys(),
            channels: self.dataset.channels(),
            selection: selection.clone(),
            kpi_labels: KpiLabels::from(&kpis),
            kpis,
            city_totals,
            payments,
            records,
            export_file_name: &self.settings.export_file_name,
            export_csv,
            logo: &self.logo,
        })
    }
}

pub fn default_selection(dataset: &Dataset) -> FilterSelection {
    FilterSelection::new(
        dataset.month_keys().first().cloned().unwrap_or_default(),
        dataset.channels().iter().cloned(),
    )
}
