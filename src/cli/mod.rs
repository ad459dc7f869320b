//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use types::{ids::TeamCode, time::Season};

use crate::{DATA_DIR_ENV_VAR, WEBDRIVER_URL_ENV_VAR};

/// Page session options shared by every scrape command
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// WebDriver endpoint (e.g. a local chromedriver at http://localhost:9515).
    /// Pages are fetched over plain HTTP when not set.
    #[clap(long, env = WEBDRIVER_URL_ENV_VAR)]
    pub webdriver: Option<String>,

    /// Seconds to wait after navigation before reading the page
    /// (each scrape command has its own default).
    #[clap(long)]
    pub settle_secs: Option<u64>,

    /// Run the browser without a visible window.
    #[clap(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub headless: bool,
}

impl SessionArgs {
    /// Render delay: `--settle-secs` when given, else the command's default.
    pub fn settle_or(&self, default: Duration) -> Duration {
        self.settle_secs
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}

#[derive(Debug, Subcommand)]
pub enum ScrapeCmd {
    /// Dump every table on a leaderboard page into `table_1`, `table_2`, ...
    Leaderboard {
        #[clap(flatten)]
        session: SessionArgs,

        /// Page to scrape.
        #[clap(long, default_value = crate::commands::leaderboard::DEFAULT_LEADERBOARD_URL)]
        url: String,

        /// SQLite file to write (defaults to `baseball_data.db` in the data dir).
        #[clap(long)]
        db: Option<PathBuf>,
    },

    /// Scrape a team's pitching split report into categorised split tables.
    TeamSplits {
        #[clap(flatten)]
        session: SessionArgs,

        /// Team abbreviation (e.g. COL).
        #[clap(long, short, default_value_t = TeamCode::default())]
        team: TeamCode,

        /// Season year (e.g. 2024).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// SQLite file to write (defaults to `<team>_data/baseball_splits_<season>.db`).
        #[clap(long)]
        db: Option<PathBuf>,
    },

    /// Walk several seasons of home/away pitching splits into a keyed table.
    SplitHistory {
        #[clap(flatten)]
        session: SessionArgs,

        /// Team abbreviation (e.g. COL).
        #[clap(long, short, default_value_t = TeamCode::default())]
        team: TeamCode,

        /// First season (inclusive).
        #[clap(long)]
        from: Season,

        /// Last season (inclusive).
        #[clap(long, default_value_t = Season::default())]
        to: Season,

        /// Regex a row's `Split` cell must match to be kept.
        #[clap(long, default_value = crate::commands::split_history::DEFAULT_SPLIT_FILTER)]
        split_filter: String,

        /// SQLite file to write (defaults to `pitching_splits_<team>.db`).
        #[clap(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AnalyzeCmd {
    /// Compare home and away pitching metrics with a paired t-test.
    HomeAway {
        /// Team abbreviation used to locate the default database.
        #[clap(long, short, default_value_t = TeamCode::default())]
        team: TeamCode,

        /// Database written by `scrape split-history`.
        #[clap(long)]
        db: Option<PathBuf>,

        /// Where to write the SVG bar chart (defaults to `home_away.svg`).
        #[clap(long)]
        chart: Option<PathBuf>,

        /// Metrics to compare (repeatable): `-m ERA -m WHIP`.
        #[clap(short = 'm', long = "metric")]
        metrics: Option<Vec<String>>,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "diamond-scrape",
    about = "Scrape baseball statistics tables into SQLite"
)]
pub struct Diamond {
    /// Log at debug level (RUST_LOG overrides).
    #[clap(long, short, global = true)]
    pub verbose: bool,

    /// Directory for databases, workbooks and charts.
    #[clap(long, global = true, env = DATA_DIR_ENV_VAR)]
    pub data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scrape statistics tables from the web
    Scrape {
        #[clap(subcommand)]
        cmd: ScrapeCmd,
    },

    /// Export every table of a database into an Excel workbook
    Export {
        /// Database to export (defaults to `baseball_data.db`).
        #[clap(long)]
        db: Option<PathBuf>,

        /// Workbook to write (defaults to `baseball_data.xlsx`).
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Run statistical comparisons over scraped data
    Analyze {
        #[clap(subcommand)]
        cmd: AnalyzeCmd,
    },
}
