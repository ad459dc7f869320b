//! Leaderboard dump: every table on a page into `table_1`, `table_2`, ...

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use super::common::{load_page, resolve_path, RunSummary};
use crate::{
    cli::SessionArgs,
    html::{discover_tables, parse_table},
    session::{PageSession, Session},
    storage::StatsDatabase,
    Result, ScrapeError,
};

/// Active spin leaderboard on Baseball Savant.
pub const DEFAULT_LEADERBOARD_URL: &str = "https://baseballsavant.mlb.com/leaderboard/active-spin?year=2024_spin-based&min=50&hand=&sort=1&sortDir=asc";

pub const DEFAULT_DB_NAME: &str = "baseball_data.db";

/// Render delay before the leaderboard DOM is read.
pub const LEADERBOARD_SETTLE: Duration = Duration::from_secs(5);

/// Scrape every table on `url` and replace `table_N` for each one that parses.
///
/// Tables are numbered in page order, counting only those that parsed.
pub async fn scrape_leaderboard<S: PageSession>(
    session: &mut S,
    url: &str,
    settle: Duration,
    db: &mut StatsDatabase,
) -> Result<RunSummary> {
    let page = load_page(session, url, settle).await?;
    let fragments = discover_tables(&page);
    if fragments.is_empty() {
        return Err(ScrapeError::NoTables);
    }
    info!("Found {} tables", fragments.len());

    let mut summary = RunSummary::default();
    let mut parsed = 0;
    for (i, fragment) in fragments.iter().enumerate() {
        let mut table = match parse_table(&fragment.html) {
            Ok(table) => table,
            Err(e) => {
                warn!("Skipping table {}: {}", i + 1, e);
                summary.skipped += 1;
                continue;
            }
        };
        table.sanitize_columns();
        parsed += 1;

        let name = format!("table_{}", parsed);
        match db.replace_table(&name, &table) {
            Ok(rows) => {
                info!(table = %name, rows, "Stored table");
                summary.processed += 1;
            }
            Err(e) => {
                warn!(table = %name, "Error storing table: {}", e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Handle `scrape leaderboard`
pub async fn handle_leaderboard(
    session_args: &SessionArgs,
    url: &str,
    db_path: Option<PathBuf>,
    data_dir: &Path,
) -> Result<()> {
    let db_path = resolve_path(db_path, data_dir, DEFAULT_DB_NAME);
    let mut db = StatsDatabase::open(&db_path)?;

    let mut session = Session::connect(session_args).await?;
    let settle = session_args.settle_or(LEADERBOARD_SETTLE);
    let result = scrape_leaderboard(&mut session, url, settle, &mut db).await;
    session.quit().await;

    let summary = result?;
    println!(
        "✓ Stored {} tables in {} ({} skipped)",
        summary.processed,
        db_path.display(),
        summary.skipped
    );
    Ok(())
}
