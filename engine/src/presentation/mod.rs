// Presentation back ends. The engine computes a DashboardView; a renderer
// only decides how it looks.
pub mod json;
pub mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use crate::error::Result;
use crate::services::DashboardView;
use std::io::Write;

pub trait DashboardRenderer {
    fn name(&self) -> &str;
    fn render(&self, view: &DashboardView<'_>, out: &mut dyn Write) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn renderer_for(format: OutputFormat) -> Box<dyn DashboardRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::default()),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
