use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV parsing system error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Missing required column '{0}' in CSV header")]
    MissingColumn(String),

    // Strict policy: one bad date aborts the whole load.
    #[error("Unparsable date '{value}' at line {line}")]
    InvalidDate { line: usize, value: String },

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
