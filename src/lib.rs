//! Baseball Statistics Scraper Library
//!
//! Scrapes statistics tables from baseball stats sites into SQLite,
//! exports them to Excel, and runs a home/away comparison over the
//! collected pitching splits.
//!
//! ## Features
//!
//! - **Page Sessions**: Drive a Chrome WebDriver endpoint, or fetch pages over plain HTTP
//! - **Table Extraction**: Multi-level headers, spans, and tables hidden in HTML comments
//! - **Database Storage**: Whole-table replacement, categorised split tables, and a keyed
//!   per-season table merged by `(split_type, year)`
//! - **Export**: One worksheet per stored table
//! - **Analysis**: Paired t-test of home vs away metrics plus an SVG bar chart
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diamond_scrape::{
//!     commands::split_history::scrape_split_history,
//!     session::HttpSession,
//!     storage::StatsDatabase,
//!     Season, SeasonRange, TeamCode,
//! };
//! use regex::Regex;
//! use std::path::Path;
//! use std::time::Duration;
//!
//! # async fn example() -> diamond_scrape::Result<()> {
//! let team: TeamCode = "COL".parse()?;
//! let seasons = SeasonRange::new(Season::new(2021), Season::new(2024))?;
//! let filter = Regex::new("^(Home|Away)$")?;
//!
//! let mut db = StatsDatabase::open(Path::new("pitching_splits_COL.db"))?;
//! let mut session = HttpSession::new()?;
//! let summary =
//!     scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
//!         .await?;
//! println!("{} seasons stored", summary.processed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export DIAMOND_DATA_DIR=~/baseball
//! export DIAMOND_WEBDRIVER_URL=http://localhost:9515
//! ```

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod error;
pub mod html;
pub mod session;
pub mod storage;
pub mod table;

// Re-export commonly used types
pub use cli::types::{ids::TeamCode, time::Season, time::SeasonRange};
pub use error::{Result, ScrapeError};
pub use table::Table;

pub const DATA_DIR_ENV_VAR: &str = "DIAMOND_DATA_DIR";
pub const WEBDRIVER_URL_ENV_VAR: &str = "DIAMOND_WEBDRIVER_URL";
