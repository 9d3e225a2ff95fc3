use super::DashboardRenderer;
use crate::error::Result;
use crate::services::DashboardView;
use std::io::Write;

/// Machine-readable back end: the whole view as pretty-printed JSON.
pub struct JsonRenderer;

impl DashboardRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, view: &DashboardView<'_>, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, view)?;
        writeln!(out)?;
        Ok(())
    }
}
