// Terminal back end. Mirrors the dashboard layout: KPI row, revenue by city
// as a bar chart, payment methods with featured entries, then the data table.
use super::DashboardRenderer;
use crate::data::OptionalAsset;
use crate::error::Result;
use crate::services::DashboardView;
use shared::models::{GroupTotal, Transaction};
use shared::utils::brazilian_format::{format_currency, format_decimal};
use std::io::Write;

const NO_REVENUE_NOTICE: &str = "Sem faturamento para as formas de pagamento selecionadas.";

pub struct TextRenderer {
    /// Width of the longest bar in the city chart, in characters.
    pub bar_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        TextRenderer { bar_width: 30 }
    }
}

impl DashboardRenderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&self, view: &DashboardView<'_>, out: &mut dyn Write) -> Result<()> {
        if let OptionalAsset::Present(logo) = view.logo {
            writeln!(out, "[{} | {}px]", logo.path.display(), logo.width)?;
        }
        writeln!(out, "Dashboard - Vendas")?;
        writeln!(out)?;

        writeln!(out, "Filtros")?;
        writeln!(out, "  Mês: {}", view.selection.month)?;
        let channels: Vec<&str> = view.selection.channels.iter().map(String::as_str).collect();
        writeln!(out, "  Canais de venda: {}", channels.join(", "))?;
        writeln!(out)?;

        write_table(
            out,
            &["Faturamento", "Número de Vendas", "Ticket Médio"],
            &[vec![
                view.kpi_labels.total_revenue.clone(),
                view.kpi_labels.transaction_count.clone(),
                view.kpi_labels.average_ticket.clone(),
            ]],
        )?;
        writeln!(out)?;

        writeln!(out, "Faturamento por Cidade — {}", view.selection.month)?;
        self.write_bars(out, &view.city_totals)?;
        writeln!(out)?;

        writeln!(out, "Faturamento por Forma de Pagamento")?;
        if view.payments.has_revenue() {
            for share in &view.payments.featured {
                writeln!(out, "  * {}: {} ({})", share.method, share.total_label, share.percent_label)?;
            }
        } else {
            writeln!(out, "  {}", NO_REVENUE_NOTICE)?;
        }
        let payment_rows: Vec<Vec<String>> = view
            .payments
            .shares
            .iter()
            .map(|s| vec![s.method.clone(), s.total_label.clone(), s.percent_label.clone()])
            .collect();
        write_table(out, &["Forma de pagamento", "Total", "Percent"], &payment_rows)?;
        writeln!(out)?;

        writeln!(out, "Dados (filtrados)")?;
        let record_rows: Vec<Vec<String>> = view.records.iter().map(record_row).collect();
        write_table(out, &["Data", "Cidade", "Ramo", "Forma de pagamento", "Total"], &record_rows)?;
        writeln!(out)?;
        writeln!(out, "Download: {} ({} linhas)", view.export_file_name, view.records.len())?;
        Ok(())
    }
}

impl TextRenderer {
    fn write_bars(&self, out: &mut dyn Write, groups: &[GroupTotal]) -> Result<()> {
        if groups.is_empty() {
            writeln!(out, "  (sem dados)")?;
            return Ok(());
        }
        let name_width = groups.iter().map(|g| g.name.chars().count()).max().unwrap_or(0);
        let max_total = groups.iter().map(|g| g.total).fold(0.0_f64, f64::max);

        for group in groups {
            let len = if max_total > 0.0 && group.total > 0.0 {
                ((group.total / max_total) * self.bar_width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                out,
                "  {:<name_width$} {:<bar_width$} {}",
                group.name,
                "█".repeat(len),
                format_currency(group.total),
                name_width = name_width,
                bar_width = self.bar_width,
            )?;
        }
        Ok(())
    }
}

fn record_row(tx: &Transaction) -> Vec<String> {
    vec![
        tx.date.format("%Y-%m-%d").to_string(),
        tx.city.clone(),
        tx.channel.clone(),
        tx.payment_method.clone(),
        tx.total.map(format_decimal).unwrap_or_default(),
    ]
}

// Plain aligned table; widths are counted in chars so accents line up.
fn write_table(out: &mut dyn Write, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(out, &header_cells, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths)?;
    for row in rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut dyn Write, cells: &[String], widths: &[usize]) -> Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(out, "  {}", padded.join(" | ").trim_end())?;
    Ok(())
}
