// Serializes a filtered view back to the loader's format: `;` delimited,
// `,` decimals, source columns in source order plus the derived month-key.
use crate::data::csv_parser::{ColumnLayout, SourceColumn, MONTH_COLUMN};
use crate::error::{DashboardError, Result};
use csv::WriterBuilder;
use shared::models::Transaction;
use shared::utils::brazilian_format;
use std::io::Write;

const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

pub struct BrazilianCsvWriter;

impl BrazilianCsvWriter {
    pub fn write_to<W: Write>(layout: &ColumnLayout, records: &[&Transaction], writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(b';').from_writer(writer);

        let mut header: Vec<&str> = layout.headers.iter().map(String::as_str).collect();
        header.push(MONTH_COLUMN);
        wtr.write_record(&header)?;

        let mut row = Vec::with_capacity(header.len());
        for tx in records {
            row.clear();
            row.extend(layout.columns.iter().map(|&column| Self::field(tx, column)));
            row.push(tx.month_key.clone());
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn to_string(layout: &ColumnLayout, records: &[&Transaction]) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write_to(layout, records, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| DashboardError::Render(format!("Export is not valid UTF-8: {}", e)))
    }

    fn field(tx: &Transaction, column: SourceColumn) -> String {
        match column {
            SourceColumn::Date => tx.date.format(EXPORT_DATE_FORMAT).to_string(),
            SourceColumn::City => tx.city.clone(),
            SourceColumn::Channel => tx.channel.clone(),
            SourceColumn::PaymentMethod => tx.payment_method.clone(),
            SourceColumn::Total => tx.total.map(brazilian_format::format_decimal).unwrap_or_default(),
            SourceColumn::Extra(idx) => tx.extra.get(idx).cloned().unwrap_or_default(),
        }
    }
}
