use crate::error::{DashboardError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Transaction;
use shared::utils::brazilian_format;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub const DATE_COLUMN: &str = "Data";
pub const CITY_COLUMN: &str = "Cidade";
pub const CHANNEL_COLUMN: &str = "Ramo";
pub const PAYMENT_COLUMN: &str = "Forma de pagamento";
pub const TOTAL_COLUMN: &str = "Total";
/// Derived month-key column written by the exporter; re-derived on load.
pub const MONTH_COLUMN: &str = "Mes";

const REQUIRED_COLUMNS: [&str; 5] = [DATE_COLUMN, CITY_COLUMN, CHANNEL_COLUMN, PAYMENT_COLUMN, TOTAL_COLUMN];

/// Where a source column's value lives inside a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceColumn {
    Date,
    City,
    Channel,
    PaymentMethod,
    Total,
    /// Index into `Transaction::extra`.
    Extra(usize),
}

/// Source header order, kept so an export reproduces the input layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    pub headers: Vec<String>,
    pub columns: Vec<SourceColumn>,
}

/// The full, immutable record set read from one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    layout: ColumnLayout,
    transactions: Vec<Transaction>,
    month_keys: Vec<String>,
    channels: Vec<String>,
}

impl Dataset {
    pub fn new(layout: ColumnLayout, transactions: Vec<Transaction>) -> Self {
        let month_keys = distinct_in_order(transactions.iter().map(|t| t.month_key.as_str()));
        let channels = distinct_in_order(transactions.iter().map(|t| t.channel.as_str()));
        Dataset { layout, transactions, month_keys, channels }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Distinct month-keys in order of first appearance.
    pub fn month_keys(&self) -> &[String] {
        &self.month_keys
    }

    /// Distinct channels ("Ramo") in order of first appearance.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

// Parses a date using the first of `formats` that accepts it. Formats with a
// time component are accepted too; only the date part is kept.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(value, fmt)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(value, fmt).ok().map(|dt| dt.date()))
    })
}

pub struct BrazilianCsvParser {
    date_formats: Vec<String>,
}

impl Default for BrazilianCsvParser {
    fn default() -> Self {
        Self::new(crate::config::DashboardSettings::default().date_formats)
    }
}

impl BrazilianCsvParser {
    pub fn new(date_formats: Vec<String>) -> Self {
        BrazilianCsvParser { date_formats }
    }

    // CSV Header (minimum): Data;Cidade;Ramo;Forma de pagamento;Total
    // Example Row: 2024-03-05;Recife;Loja;Pix;1.234,56
    pub fn load_transactions(&self, file_path: impl AsRef<Path>) -> Result<Dataset> {
        let file_path = file_path.as_ref();
        let file = File::open(file_path)?;
        let dataset = self.parse_reader(BufReader::new(file))?;
        tracing::info!(
            path = %file_path.display(),
            rows = dataset.len(),
            months = dataset.month_keys().len(),
            "Loaded sales data"
        );
        Ok(dataset)
    }

    pub fn parse_str(&self, content: &str) -> Result<Dataset> {
        self.parse_reader(content.as_bytes())
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(Trim::All)
            // Short rows read as empty cells; extra trailing cells are ignored.
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let (layout, positions) = Self::resolve_layout(&headers)?;

        let mut transactions = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;
            transactions.push(self.parse_record(&record, &layout, &positions, line)?);
        }

        Ok(Dataset::new(layout, transactions))
    }

    // Maps every header to its place in a Transaction. `positions[i]` is the
    // record index feeding `layout.columns[i]`; the derived month column is
    // skipped entirely.
    fn resolve_layout(headers: &StringRecord) -> Result<(ColumnLayout, Vec<usize>)> {
        let mut layout = ColumnLayout::default();
        let mut positions = Vec::new();
        let mut extra_count = 0;

        for (pos, header) in headers.iter().enumerate() {
            let name = header.trim_start_matches('\u{feff}');
            if name == MONTH_COLUMN {
                continue;
            }
            let column = match name {
                DATE_COLUMN if !layout.columns.contains(&SourceColumn::Date) => SourceColumn::Date,
                CITY_COLUMN if !layout.columns.contains(&SourceColumn::City) => SourceColumn::City,
                CHANNEL_COLUMN if !layout.columns.contains(&SourceColumn::Channel) => SourceColumn::Channel,
                PAYMENT_COLUMN if !layout.columns.contains(&SourceColumn::PaymentMethod) => {
                    SourceColumn::PaymentMethod
                }
                TOTAL_COLUMN if !layout.columns.contains(&SourceColumn::Total) => SourceColumn::Total,
                _ => {
                    extra_count += 1;
                    SourceColumn::Extra(extra_count - 1)
                }
            };
            layout.headers.push(name.to_string());
            layout.columns.push(column);
            positions.push(pos);
        }

        for required in REQUIRED_COLUMNS {
            if !layout.headers.iter().any(|h| h == required) {
                return Err(DashboardError::MissingColumn(required.to_string()));
            }
        }

        Ok((layout, positions))
    }

    fn parse_record(
        &self,
        record: &StringRecord,
        layout: &ColumnLayout,
        positions: &[usize],
        line: usize,
    ) -> Result<Transaction> {
        let mut date = None;
        let mut city = String::new();
        let mut channel = String::new();
        let mut payment_method = String::new();
        let mut total = None;
        let mut extra = Vec::new();

        for (&column, &pos) in layout.columns.iter().zip(positions) {
            let value = record.get(pos).unwrap_or("");
            match column {
                SourceColumn::Date => {
                    date = Some(parse_date(value, &self.date_formats).ok_or_else(|| {
                        DashboardError::InvalidDate { line, value: value.to_string() }
                    })?);
                }
                SourceColumn::City => city = value.to_string(),
                SourceColumn::Channel => channel = value.to_string(),
                SourceColumn::PaymentMethod => payment_method = value.to_string(),
                SourceColumn::Total => total = Self::parse_total(value, line),
                SourceColumn::Extra(_) => extra.push(value.to_string()),
            }
        }

        // resolve_layout guarantees a Date column, so every record sets it.
        let date = date.ok_or_else(|| DashboardError::MissingColumn(DATE_COLUMN.to_string()))?;
        Ok(Transaction {
            date,
            city,
            channel,
            payment_method,
            total,
            month_key: Transaction::month_key_for(date),
            extra,
        })
    }

    fn parse_total(value: &str, line: usize) -> Option<f64> {
        if value.is_empty() {
            return None;
        }
        match brazilian_format::parse_decimal(value) {
            Ok(total) => Some(total),
            Err(e) => {
                tracing::warn!(line, value, error = %e, "Non-numeric 'Total', treating as missing");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_transactions_valid_data() {
        let csv_content = "\
ID da venda;Cidade;Ramo;Total;Data;Forma de pagamento
750-67-8428;Recife;Loja;548,9715;2019-01-05;Pix
226-31-3081;Natal;Online;1.080,32;03/08/2019;Dinheiro";
        let tmp_file = create_test_csv(csv_content);
        let dataset = BrazilianCsvParser::default().load_transactions(tmp_file.path()).unwrap();

        assert_eq!(dataset.len(), 2);
        let first = &dataset.transactions()[0];
        assert_eq!(first.city, "Recife");
        assert_eq!(first.channel, "Loja");
        assert_eq!(first.payment_method, "Pix");
        assert_eq!(first.total, Some(548.9715));
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2019, 1, 5).unwrap());
        assert_eq!(first.month_key, "1/2019");
        assert_eq!(first.extra, vec!["750-67-8428".to_string()]);

        // Slash dates are month first.
        let second = &dataset.transactions()[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2019, 3, 8).unwrap());
        assert_eq!(second.month_key, "3/2019");
        assert_eq!(second.total, Some(1080.32));

        assert_eq!(dataset.month_keys(), ["1/2019".to_string(), "3/2019".to_string()]);
        assert_eq!(dataset.channels(), ["Loja".to_string(), "Online".to_string()]);
    }

    #[test]
    fn test_layout_preserves_source_order() {
        let dataset = BrazilianCsvParser::default()
            .parse_str("Nota;Data;Cidade;Ramo;Forma de pagamento;Total;Obs\nx;2024-03-01;A;B;C;1;y")
            .unwrap();
        let layout = dataset.layout();
        assert_eq!(layout.headers, ["Nota", "Data", "Cidade", "Ramo", "Forma de pagamento", "Total", "Obs"]);
        assert_eq!(layout.columns[0], SourceColumn::Extra(0));
        assert_eq!(layout.columns[1], SourceColumn::Date);
        assert_eq!(layout.columns[6], SourceColumn::Extra(1));
        assert_eq!(dataset.transactions()[0].extra, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_month_column_is_rederived() {
        let dataset = BrazilianCsvParser::default()
            .parse_str("Data;Cidade;Ramo;Forma de pagamento;Total;Mes\n2024-03-01;A;B;C;1;9/1999")
            .unwrap();
        assert!(!dataset.layout().headers.iter().any(|h| h == MONTH_COLUMN));
        assert_eq!(dataset.transactions()[0].month_key, "3/2024");
    }

    #[test]
    fn test_load_transactions_empty_file() {
        let tmp_file = create_test_csv("Data;Cidade;Ramo;Forma de pagamento;Total");
        let dataset = BrazilianCsvParser::default().load_transactions(tmp_file.path()).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.month_keys().is_empty());
        assert!(dataset.channels().is_empty());
    }

    #[test]
    fn test_load_transactions_missing_column() {
        let tmp_file = create_test_csv("Data;Cidade;Ramo;Total\n2024-03-01;A;B;1");
        let err = BrazilianCsvParser::default().load_transactions(tmp_file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(ref c) if c == PAYMENT_COLUMN));
    }

    #[test]
    fn test_timestamp_dates_load() {
        let dataset = BrazilianCsvParser::default()
            .parse_str(
                "Data;Cidade;Ramo;Forma de pagamento;Total\n\
                 2024-03-05T10:00:00;A;B;C;1\n\
                 1/5/2019 10:29;A;B;C;2\n\
                 2024/03/05;A;B;C;3",
            )
            .unwrap();
        let keys: Vec<&str> = dataset.transactions().iter().map(|t| t.month_key.as_str()).collect();
        assert_eq!(keys, ["3/2024", "1/2019", "3/2024"]);
    }

    #[test]
    fn test_invalid_date_aborts_whole_load() {
        let csv_content = "\
Data;Cidade;Ramo;Forma de pagamento;Total
2024-03-01;A;B;C;1
ontem;A;B;C;2
2024-03-02;A;B;C;3";
        let err = BrazilianCsvParser::default().parse_str(csv_content).unwrap_err();
        match err {
            DashboardError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "ontem");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_total_loads_as_missing() {
        let dataset = BrazilianCsvParser::default()
            .parse_str("Data;Cidade;Ramo;Forma de pagamento;Total\n2024-03-01;A;B;C;abc\n2024-03-01;A;B;C;")
            .unwrap();
        assert_eq!(dataset.transactions()[0].total, None);
        assert_eq!(dataset.transactions()[1].total, None);
    }

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let dataset = BrazilianCsvParser::default()
            .parse_str(
                "Data;Cidade;Ramo;Forma de pagamento;Total;Obs\n\
                 2024-03-01;Recife;A;Pix\n\
                 2024-03-02;Natal;B;Pix;7,5;x;sobra",
            )
            .unwrap();
        let short = &dataset.transactions()[0];
        assert_eq!(short.payment_method, "Pix");
        assert_eq!(short.total, None);
        assert_eq!(short.extra, vec![String::new()]);

        let long = &dataset.transactions()[1];
        assert_eq!(long.total, Some(7.5));
        assert_eq!(long.extra, vec!["x".to_string()]);
    }

    #[test]
    fn test_short_row_without_date_is_invalid() {
        let err = BrazilianCsvParser::default()
            .parse_str("Cidade;Ramo;Forma de pagamento;Total;Data\nRecife;A;Pix;1")
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidDate { line: 2, ref value } if value.is_empty()));
    }

    #[test]
    fn test_parse_date_formats() {
        let formats = crate::config::DashboardSettings::default().date_formats;
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09", &formats), Some(expected));
        assert_eq!(parse_date("3/9/2024", &formats), Some(expected));
        assert_eq!(parse_date("2024-03-09 18:20:00", &formats), Some(expected));
        assert_eq!(parse_date("2024-03-09 18:20:00.125", &formats), Some(expected));
        assert_eq!(parse_date("2024-03-09T18:20:00", &formats), Some(expected));
        assert_eq!(parse_date("2024-03-09T18:20:00.5", &formats), Some(expected));
        assert_eq!(parse_date("2024-03-09 18:20", &formats), Some(expected));
        assert_eq!(parse_date("2024/03/09", &formats), Some(expected));
        assert_eq!(parse_date("3/9/2024 10:29", &formats), Some(expected));
        assert_eq!(parse_date("3/9/2024 10:29:59", &formats), Some(expected));
        assert_eq!(parse_date("09.03.2024", &formats), None);
        assert_eq!(parse_date("13/40/2024", &formats), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BrazilianCsvParser::default()
            .load_transactions("/definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, DashboardError::Io { .. }));
    }
}
