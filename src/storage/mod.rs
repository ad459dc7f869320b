//! Storage layer for scraped statistics tables
//!
//! This module wraps the local SQLite files the scrape jobs write,
//! organized into logical components:
//! - `models`: Data structures read back for analysis
//! - `schema`: Database connection and fixed split schemas
//! - `queries`: Whole-table replace/read operations
//! - `splits`: Categorised split tables and the keyed pitching split table

pub mod models;
pub mod queries;
pub mod schema;
pub mod splits;


// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::StatsDatabase;

/// Quote an SQL identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
