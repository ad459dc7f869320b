//! Multi-season home/away pitching splits into the keyed `pitching_splits` table.

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info, warn};

use super::{common::load_page, team_splits::team_splits_url, RunSummary};
use crate::{
    cli::{types::time::SeasonRange, SessionArgs},
    html::{discover_tables, parse_table, TableFragment},
    session::{PageSession, Session},
    storage::{splits::PITCHING_SPLIT_KEY, StatsDatabase},
    table::Table,
    Result, ScrapeError, Season, TeamCode,
};

/// Rows kept from each home/away table.
pub const DEFAULT_SPLIT_FILTER: &str = "^(Home|Away)$";

pub const SPLIT_HISTORY_SETTLE: Duration = Duration::from_secs(5);

/// Table ids of the home/away section of the split report.
const HOME_AWAY_ID_PREFIX: &str = "hmvis";
const HOME_AWAY_HEADING: &str = "home or away";

/// `pitching_splits_<team>.db` under the data dir.
pub fn default_db_path(data_dir: &Path, team: &TeamCode) -> PathBuf {
    data_dir.join(format!("pitching_splits_{}.db", team))
}

/// Whether a fragment belongs to the home/away section of the report.
pub fn is_home_away(fragment: &TableFragment) -> bool {
    fragment
        .id
        .as_deref()
        .is_some_and(|id| id.starts_with(HOME_AWAY_ID_PREFIX))
        || fragment.category.to_lowercase().contains(HOME_AWAY_HEADING)
}

/// Turn a parsed split table into keyed rows: keep rows whose `Split`
/// matches `filter`, rename `Split` to `split_type`, and lead with
/// `split_type, year`.
pub fn clean_split_table(mut table: Table, season: Season, filter: &Regex) -> Result<Table> {
    table.sanitize_columns();
    let dropped = table.filter_rows("Split", filter)?;
    debug!(season = %season, dropped, kept = table.len(), "Filtered split rows");

    table.rename_columns(&[("Split", "split_type")]);
    table.insert_constant_column(0, "year", &season.to_string());
    table.reorder_columns(&PITCHING_SPLIT_KEY)?;
    Ok(table)
}

async fn scrape_season<S: PageSession>(
    session: &mut S,
    url: &str,
    season: Season,
    filter: &Regex,
    settle: Duration,
    db: &mut StatsDatabase,
) -> Result<usize> {
    let page = load_page(session, url, settle).await?;
    let fragments: Vec<TableFragment> = discover_tables(&page)
        .into_iter()
        .filter(is_home_away)
        .collect();
    if fragments.is_empty() {
        return Err(ScrapeError::NoTables);
    }

    let mut stored = 0;
    let mut last_error = None;
    for fragment in &fragments {
        match store_fragment(fragment, season, filter, db) {
            Ok(rows) => stored += rows,
            Err(e) => {
                warn!(season = %season, id = ?fragment.id, "Skipping table: {}", e);
                last_error = Some(e);
            }
        }
    }

    // A season counts as skipped only when none of its tables could be used.
    match last_error {
        Some(e) if stored == 0 => Err(e),
        _ => Ok(stored),
    }
}

fn store_fragment(
    fragment: &TableFragment,
    season: Season,
    filter: &Regex,
    db: &mut StatsDatabase,
) -> Result<usize> {
    debug!(id = ?fragment.id, from_comment = fragment.from_comment, "Cleaning split table");
    let table = clean_split_table(parse_table(&fragment.html)?, season, filter)?;
    if table.is_empty() {
        return Ok(0);
    }
    Ok(db.upsert_pitching_splits(&table)?)
}

/// Walk `seasons` in order. A season that fails is logged and skipped.
pub async fn scrape_split_history<S: PageSession>(
    session: &mut S,
    team: &TeamCode,
    seasons: SeasonRange,
    filter: &Regex,
    settle: Duration,
    db: &mut StatsDatabase,
) -> Result<RunSummary> {
    db.ensure_pitching_splits()?;

    let mut summary = RunSummary::default();
    for season in seasons.iter() {
        let url = team_splits_url(team, season);
        match scrape_season(session, &url, season, filter, settle, db).await {
            Ok(rows) => {
                info!(season = %season, rows, "Stored home/away splits");
                summary.processed += 1;
            }
            Err(e) => {
                warn!(season = %season, "Skipping season: {}", e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Handle `scrape split-history`
pub async fn handle_split_history(
    session_args: &SessionArgs,
    team: &TeamCode,
    seasons: SeasonRange,
    split_filter: &str,
    db_path: Option<PathBuf>,
    data_dir: &Path,
) -> Result<()> {
    let filter = Regex::new(split_filter)?;
    let db_path = db_path.unwrap_or_else(|| default_db_path(data_dir, team));
    let mut db = StatsDatabase::open(&db_path)?;

    let mut session = Session::connect(session_args).await?;
    let settle = session_args.settle_or(SPLIT_HISTORY_SETTLE);
    let result =
        scrape_split_history(&mut session, team, seasons, &filter, settle, &mut db).await;
    session.quit().await;

    let summary = result?;
    println!(
        "✓ Seasons {}: {} stored, {} skipped ({})",
        seasons,
        summary.processed,
        summary.skipped,
        db_path.display()
    );
    Ok(())
}
