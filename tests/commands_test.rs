//! Integration tests for command handlers, driven by fixture pages

use std::collections::HashMap;
use std::time::Duration;

use diamond_scrape::{
    commands::{
        export::{export_workbook, handle_export},
        home_away::{analyze_home_away, handle_home_away, ALPHA},
        leaderboard::scrape_leaderboard,
        split_history::{scrape_split_history, DEFAULT_SPLIT_FILTER},
        team_splits::{scrape_team_splits, team_splits_url},
    },
    session::PageSession,
    storage::StatsDatabase,
    Result, ScrapeError, Season, SeasonRange, TeamCode,
};
use regex::Regex;
use tempfile::TempDir;

const TEAM_SPLITS_PAGE: &str = include_str!("fixtures/team_splits_col_2024.html");
const LEADERBOARD_PAGE: &str = include_str!("fixtures/leaderboard.html");
const LEADERBOARD_URL: &str = "https://baseballsavant.mlb.com/leaderboard/active-spin";

/// Serves canned pages by URL and records every navigation.
#[derive(Default)]
struct FixtureSession {
    pages: HashMap<String, String>,
    current: Option<String>,
    visited: Vec<String>,
}

impl FixtureSession {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn source(&self) -> Result<&str> {
        self.current.as_deref().ok_or(ScrapeError::NoTables)
    }
}

impl PageSession for FixtureSession {
    async fn open(&mut self, url: &str) -> Result<()> {
        self.visited.push(url.to_string());
        match self.pages.get(url) {
            Some(page) => {
                self.current = Some(page.clone());
                Ok(())
            }
            None => {
                self.current = None;
                Err(ScrapeError::WebDriver {
                    error: "unknown error".to_string(),
                    message: format!("net::ERR_NAME_NOT_RESOLVED at {}", url),
                })
            }
        }
    }

    async fn wait_for_tag(&mut self, tag: &str, timeout: Duration) -> Result<()> {
        if self.source()?.contains(&format!("<{}", tag)) {
            Ok(())
        } else {
            Err(ScrapeError::ElementTimeout {
                tag: tag.to_string(),
                seconds: timeout.as_secs(),
            })
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        Ok(self.source()?.to_string())
    }

    async fn quit(&mut self) {
        self.current = None;
    }
}

fn team() -> TeamCode {
    "COL".parse().unwrap()
}

/// A split report for one season whose only home/away table carries the
/// given ERA and SO/W values.
fn season_page(year: u16, home: (&str, &str), away: (&str, &str)) -> String {
    format!(
        r#"<html><body>
<h1>{year} Colorado Rockies Pitching Splits</h1>
<div id="all_total"><h2>Season Totals</h2>
  <table id="total"><thead><tr><th>Split</th><th>G</th></tr></thead>
  <tbody><tr><th>{year} Totals</th><td>162</td></tr></tbody></table>
</div>
<div id="all_hmvis"><h2>Home or Away</h2>
<!--
  <table id="hmvis"><caption>Home or Away Game-Level Table</caption>
  <thead><tr><th>Split</th><th>ERA</th><th>IP</th><th>HR</th><th>SO/W</th></tr></thead>
  <tbody>
    <tr><th>Home</th><td>{}</td><td>720.0</td><td>100</td><td>{}</td></tr>
    <tr><th>Away</th><td>{}</td><td>720.0</td><td>80</td><td>{}</td></tr>
  </tbody></table>
-->
</div>
</body></html>"#,
        home.0, home.1, away.0, away.1
    )
}

fn history_session(team: &TeamCode) -> FixtureSession {
    let seasons = [
        (2021, ("5.50", "2.10"), ("4.60", "2.30")),
        (2022, ("5.80", "2.00"), ("4.70", "2.20")),
        (2023, ("6.10", "1.90"), ("5.00", "1.80")),
        (2024, ("5.71", "1.95"), ("4.98", "2.31")),
    ];
    seasons
        .into_iter()
        .fold(FixtureSession::default(), |session, (year, home, away)| {
            let url = team_splits_url(team, Season::new(year));
            session.with_page(&url, &season_page(year, home, away))
        })
}

#[tokio::test]
async fn test_leaderboard_stores_every_table() {
    let mut session = FixtureSession::default().with_page(LEADERBOARD_URL, LEADERBOARD_PAGE);
    let mut db = StatsDatabase::new_in_memory().unwrap();

    let summary = scrape_leaderboard(&mut session, LEADERBOARD_URL, Duration::ZERO, &mut db)
        .await
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(db.table_names().unwrap(), vec!["table_1", "table_2"]);

    let spin = db.read_table("table_1").unwrap();
    assert_eq!(spin.columns[0], "Player_Name");
    assert_eq!(spin.columns[3], "Four-Seam_rpm");
    assert_eq!(spin.len(), 3);
    assert_eq!(spin.cell(2, "Player_Name"), Some("Quantrill, Cal"));

    let glossary = db.read_table("table_2").unwrap();
    assert_eq!(glossary.columns, vec!["col_1", "col_2"]);
}

#[tokio::test]
async fn test_leaderboard_rerun_replaces_tables() {
    let mut session = FixtureSession::default().with_page(LEADERBOARD_URL, LEADERBOARD_PAGE);
    let mut db = StatsDatabase::new_in_memory().unwrap();

    for _ in 0..2 {
        scrape_leaderboard(&mut session, LEADERBOARD_URL, Duration::ZERO, &mut db)
            .await
            .unwrap();
    }

    assert_eq!(db.row_count("table_1").unwrap(), 3);
}

#[tokio::test]
async fn test_leaderboard_page_without_tables() {
    let url = "https://example.com/loading";
    let mut session =
        FixtureSession::default().with_page(url, "<html><body><p>Loading...</p></body></html>");
    let mut db = StatsDatabase::new_in_memory().unwrap();

    let result = scrape_leaderboard(&mut session, url, Duration::ZERO, &mut db).await;
    assert!(matches!(result, Err(ScrapeError::NoTables)));
    assert!(db.table_names().unwrap().is_empty());
}

#[tokio::test]
async fn test_team_splits_categorises_tables() {
    let url = team_splits_url(&team(), Season::new(2024));
    let mut session = FixtureSession::default().with_page(&url, TEAM_SPLITS_PAGE);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    db.reset_split_tables().unwrap();

    let summary = scrape_team_splits(&mut session, &url, Duration::ZERO, &mut db)
        .await
        .unwrap();

    // The glossary table shares no columns with the split schema.
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(session.visited, vec![url]);

    assert_eq!(db.count_category("splits_data", "Season Totals").unwrap(), 1);
    assert_eq!(
        db.count_category("game_level_splits", "Home or Away").unwrap(),
        2
    );

    let game_level = db.read_table("game_level_splits").unwrap();
    assert_eq!(game_level.cell(0, "Split"), Some("Home"));
    assert_eq!(game_level.cell(1, "ERA"), Some("4.98"));
    assert_eq!(game_level.cell(0, "SO/W"), Some("1.95"));
    assert_eq!(game_level.cell(0, "category"), Some("Home or Away"));
    assert!(game_level.cell(0, "capture_date").is_some_and(|d| !d.is_empty()));
}

#[tokio::test]
async fn test_team_splits_times_out_without_tables() {
    let url = "https://www.baseball-reference.com/teams/split.cgi?t=p&team=COL&year=1870";
    let mut session =
        FixtureSession::default().with_page(url, "<html><body><p>No data</p></body></html>");
    let mut db = StatsDatabase::new_in_memory().unwrap();
    db.reset_split_tables().unwrap();

    let result = scrape_team_splits(&mut session, url, Duration::ZERO, &mut db).await;
    assert!(matches!(
        result,
        Err(ScrapeError::ElementTimeout { ref tag, seconds: 10 }) if tag == "table"
    ));
}

#[tokio::test]
async fn test_split_history_builds_keyed_table() {
    let team = team();
    let mut session = history_session(&team);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2021), Season::new(2024)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();

    let summary =
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.skipped, 0);
    assert_eq!(session.visited.len(), 4);

    let rows = db.pitching_split_rows().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0].year, 2021);
    assert_eq!(rows[0].split_type, "Away");
    assert_eq!(rows[0].stat("ERA"), Some("4.60"));
    assert_eq!(rows[7].year, 2024);
    assert_eq!(rows[7].split_type, "Home");
    assert_eq!(rows[7].stat("SO_W"), Some("1.95"));
}

#[tokio::test]
async fn test_split_history_skips_missing_season() {
    let team = team();
    let mut session = history_session(&team);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2020), Season::new(2022)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();

    let summary =
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(db.pitching_split_rows().unwrap().len(), 4);
}

/// A season whose usable home/away table is followed by one without a Split column.
const SEASON_WITH_EXTRA_TABLE: &str = r#"<html><body>
<div id="all_hmvis"><h2>Home or Away</h2>
  <table id="hmvis"><thead><tr><th>Split</th><th>ERA</th></tr></thead>
  <tbody>
    <tr><th>Home</th><td>5.71</td></tr>
    <tr><th>Away</th><td>4.98</td></tr>
  </tbody></table>
  <table id="hmvis_extra"><thead><tr><th>Rk</th><th>OPS</th></tr></thead>
  <tbody><tr><td>1</td><td>.812</td></tr></tbody></table>
</div>
</body></html>"#;

#[tokio::test]
async fn test_split_history_skips_unusable_table_but_keeps_season() {
    let team = team();
    let url = team_splits_url(&team, Season::new(2024));
    let mut session = FixtureSession::default().with_page(&url, SEASON_WITH_EXTRA_TABLE);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2024), Season::new(2024)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();

    let summary =
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();

    // The stored rows and the summary agree.
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
    let rows = db.pitching_split_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].split_type, "Home");
    assert_eq!(rows[1].stat("ERA"), Some("5.71"));
}

#[tokio::test]
async fn test_split_history_skips_season_without_usable_table() {
    let team = team();
    let url = team_splits_url(&team, Season::new(2024));
    let page = r#"<html><body>
<table id="hmvis"><thead><tr><th>Rk</th><th>OPS</th></tr></thead>
<tbody><tr><td>1</td><td>.812</td></tr></tbody></table>
</body></html>"#;
    let mut session = FixtureSession::default().with_page(&url, page);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2024), Season::new(2024)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();

    let summary =
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 1);
    assert!(db.pitching_split_rows().unwrap().is_empty());
}

#[tokio::test]
async fn test_split_history_rerun_keeps_one_row_per_key() {
    let team = team();
    let mut session = history_session(&team);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2023), Season::new(2024)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();

    for _ in 0..2 {
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();
    }

    assert_eq!(db.pitching_split_rows().unwrap().len(), 4);
}

#[tokio::test]
async fn test_home_away_analysis_over_scraped_history() {
    let team = team();
    let mut session = history_session(&team);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    let seasons = SeasonRange::new(Season::new(2021), Season::new(2024)).unwrap();
    let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();
    scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
        .await
        .unwrap();

    let metrics = vec!["ERA".to_string(), "XFIP".to_string(), "HR9".to_string()];
    let comparisons = analyze_home_away(&db, &metrics).unwrap();

    // XFIP is not in the table and is skipped.
    assert_eq!(comparisons.len(), 2);

    let era = &comparisons[0];
    assert_eq!(era.metric, "ERA");
    assert_eq!(era.test.n, 4);
    assert!((era.test.mean_diff - 0.9575).abs() < 1e-9);
    assert!(era.is_significant(ALPHA));

    // 100 vs 80 home runs over 720 innings every season.
    let hr9 = &comparisons[1];
    assert!((hr9.test.mean_diff - 0.25).abs() < 1e-9);
    assert_eq!(hr9.test.p, 0.0);
}

#[tokio::test]
async fn test_handle_home_away_writes_chart() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("pitching_splits_COL.db");
    let chart_path = dir.path().join("charts").join("home_away.svg");

    let team = team();
    {
        let mut session = history_session(&team);
        let mut db = StatsDatabase::open(&db_path).unwrap();
        let seasons = SeasonRange::new(Season::new(2021), Season::new(2024)).unwrap();
        let filter = Regex::new(DEFAULT_SPLIT_FILTER).unwrap();
        scrape_split_history(&mut session, &team, seasons, &filter, Duration::ZERO, &mut db)
            .await
            .unwrap();
    }

    handle_home_away(
        &team,
        Some(db_path),
        Some(chart_path.clone()),
        vec!["ERA".to_string(), "SO_W".to_string()],
        dir.path(),
    )
    .unwrap();

    let svg = std::fs::read_to_string(&chart_path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("ERA"));
    assert!(svg.contains("SO_W"));
}

#[tokio::test]
async fn test_export_after_leaderboard() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("baseball_data.db");
    let out = dir.path().join("exports").join("baseball_data.xlsx");

    {
        let mut session = FixtureSession::default().with_page(LEADERBOARD_URL, LEADERBOARD_PAGE);
        let mut db = StatsDatabase::open(&db_path).unwrap();
        scrape_leaderboard(&mut session, LEADERBOARD_URL, Duration::ZERO, &mut db)
            .await
            .unwrap();
        assert_eq!(export_workbook(&db, &out).unwrap(), 2);
    }
    assert!(out.exists());

    // The handler resolves the same files from the data dir.
    std::fs::remove_file(&out).unwrap();
    handle_export(None, Some(out.clone()), dir.path()).unwrap();
    assert!(out.exists());
}

/// Raw XML of one worksheet inside an exported workbook.
fn worksheet_xml(workbook: &std::path::Path, sheet: usize) -> String {
    use std::io::Read;

    let file = std::fs::File::open(workbook).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive
        .by_name(&format!("xl/worksheets/sheet{}.xml", sheet))
        .unwrap();
    let mut xml = String::new();
    entry.read_to_string(&mut xml).unwrap();
    xml
}

#[tokio::test]
async fn test_export_writes_numbers_as_numeric_cells() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("baseball_data.xlsx");

    let mut session = FixtureSession::default().with_page(LEADERBOARD_URL, LEADERBOARD_PAGE);
    let mut db = StatsDatabase::new_in_memory().unwrap();
    scrape_leaderboard(&mut session, LEADERBOARD_URL, Duration::ZERO, &mut db)
        .await
        .unwrap();
    export_workbook(&db, &out).unwrap();

    let xml = worksheet_xml(&out, 1);
    // Shared-string cells carry t="s"; numeric cells hold the value inline.
    let cell = |reference: &str| {
        Regex::new(&format!(r#"<c r="{}"([^>]*)><v>([^<]*)</v>"#, reference))
            .unwrap()
            .captures(&xml)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .unwrap()
    };

    let (attrs, _) = cell("A2");
    assert!(attrs.contains(r#"t="s""#));
    let (attrs, value) = cell("C2");
    assert!(!attrs.contains("t="));
    assert_eq!(value.parse::<f64>().unwrap(), 91.2);
    let (attrs, value) = cell("D2");
    assert!(!attrs.contains("t="));
    assert_eq!(value.parse::<f64>().unwrap(), 2251.0);
}

#[test]
fn test_export_empty_database() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("empty.xlsx");
    let db = StatsDatabase::new_in_memory().unwrap();

    assert_eq!(export_workbook(&db, &out).unwrap(), 0);
    assert!(out.exists());
}
