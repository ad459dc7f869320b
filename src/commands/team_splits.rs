//! Team pitching split report into `splits_data` and `game_level_splits`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::common::{capture_timestamp, RunSummary};
use crate::{
    cli::SessionArgs,
    html::{discover_tables, parse_table, TableFragment},
    session::{PageSession, Session},
    storage::{splits::split_table_for, StatsDatabase},
    Result, ScrapeError, Season, TeamCode,
};

pub const TEAM_SPLITS_SETTLE: Duration = Duration::from_secs(3);

/// How long to wait for the first `<table>` after the settle delay.
pub const TABLE_WAIT: Duration = Duration::from_secs(10);

/// Split report URL for one team and season.
pub fn team_splits_url(team: &TeamCode, season: Season) -> String {
    format!(
        "https://www.baseball-reference.com/teams/split.cgi?t=p&team={}&year={}",
        team, season
    )
}

/// `<team>_data/baseball_splits_<season>.db` under the data dir.
pub fn default_db_path(data_dir: &Path, team: &TeamCode, season: Season) -> PathBuf {
    data_dir
        .join(format!("{}_data", team.as_str().to_ascii_lowercase()))
        .join(format!("baseball_splits_{}.db", season))
}

/// Parse one fragment and append it under its category. Returns rows stored.
fn store_fragment(
    db: &mut StatsDatabase,
    fragment: &TableFragment,
    captured_at: &str,
) -> Result<usize> {
    info!(
        category = %fragment.category,
        game_level = fragment.game_level,
        from_comment = fragment.from_comment,
        "Processing table"
    );

    let table = parse_table(&fragment.html)?;
    if table.is_empty() {
        return Err(ScrapeError::EmptyTable);
    }
    debug!(shape = ?table.shape(), "Extracted split table");

    let inserted = db.append_splits(
        &fragment.category,
        &table,
        fragment.game_level,
        captured_at,
    )?;
    let target = split_table_for(fragment.game_level);
    let verified = db.count_category(target, &fragment.category)?;
    info!(
        table = target,
        inserted, verified, "Stored split rows for {:?}", fragment.category
    );
    Ok(inserted)
}

/// Navigate to the split report, wait for tables, and append every table
/// that parses. A failure on one table is logged and the next one is tried.
pub async fn scrape_team_splits<S: PageSession>(
    session: &mut S,
    url: &str,
    settle: Duration,
    db: &mut StatsDatabase,
) -> Result<RunSummary> {
    info!(url, "Accessing split report");
    session.open(url).await?;
    session.settle(settle).await;
    info!("Page loaded, waiting for tables...");
    session.wait_for_tag("table", TABLE_WAIT).await?;

    let page = session.page_source().await?;
    let fragments = discover_tables(&page);
    info!("Found {} tables", fragments.len());

    let captured_at = capture_timestamp();
    let mut summary = RunSummary::default();
    for (i, fragment) in fragments.iter().enumerate() {
        match store_fragment(db, fragment, &captured_at) {
            Ok(_) => summary.processed += 1,
            Err(e) => {
                warn!("Error processing table {}/{}: {}", i + 1, fragments.len(), e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Handle `scrape team-splits`
pub async fn handle_team_splits(
    session_args: &SessionArgs,
    team: &TeamCode,
    season: Season,
    db_path: Option<PathBuf>,
    data_dir: &Path,
) -> Result<()> {
    let db_path = db_path.unwrap_or_else(|| default_db_path(data_dir, team, season));
    info!(path = %db_path.display(), "Initializing split database");
    let mut db = StatsDatabase::open(&db_path)?;
    db.reset_split_tables()?;

    let mut session = Session::connect(session_args).await?;
    let settle = session_args.settle_or(TEAM_SPLITS_SETTLE);
    let url = team_splits_url(team, season);
    let result = scrape_team_splits(&mut session, &url, settle, &mut db).await;
    session.quit().await;

    let summary = result?;
    println!(
        "✓ Scraping complete: {} tables stored, {} skipped ({})",
        summary.processed,
        summary.skipped,
        db_path.display()
    );
    Ok(())
}
