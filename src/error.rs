//! Error types for the baseball stats scraper

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Timed out after {seconds}s waiting for <{tag}>")]
    ElementTimeout { tag: String, seconds: u64 },

    #[error("No tables found on page")]
    NoTables,

    #[error("Table has no header and no rows")]
    EmptyTable,

    #[error("Missing column: {column}")]
    MissingColumn { column: String },

    #[error("Invalid season: {value}")]
    InvalidSeason { value: String },

    #[error("Invalid season range: {from} is after {to}")]
    InvalidSeasonRange { from: u16, to: u16 },

    #[error("Invalid team code: {value}")]
    InvalidTeam { value: String },

    #[error("Not enough paired observations for {metric}: {count}")]
    InsufficientData { metric: String, count: usize },

    #[error("Statistics error: {message}")]
    Analysis { message: String },
}
