//! Common utilities and helper functions shared across commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::{session::PageSession, Result};

/// Directory name under the platform data dir.
pub const DATA_DIR_NAME: &str = "diamond-scrape";

/// Outcome of a job that works through several units (tables or seasons).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Use `dir` when given, else `<platform data dir>/diamond-scrape`,
/// else the working directory.
pub fn resolve_data_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| {
        dirs::data_dir()
            .map(|d| d.join(DATA_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// An explicit path wins; otherwise `default_name` inside the data dir.
pub fn resolve_path(explicit: Option<PathBuf>, data_dir: &Path, default_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| data_dir.join(default_name))
}

/// Local wall-clock time stamped on every stored split row.
pub fn capture_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Navigate, wait out the render delay, and return the page source.
pub async fn load_page<S: PageSession>(session: &mut S, url: &str, settle: Duration) -> Result<String> {
    info!(url, "Accessing page");
    session.open(url).await?;
    session.settle(settle).await;
    session.page_source().await
}
