//! Database connection and schema management

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Columns of `splits_data`, as the split report labels them.
pub const SPLITS_DATA_COLUMNS: &[&str] = &[
    "Split", "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "SB", "CS", "BB", "SO", "SO/W", "BA",
    "OBP", "SLG", "OPS", "TB", "GDP", "HBP", "SH", "SF", "IBB", "ROE", "BAbip", "tOPS+", "sOPS+",
];

/// Columns of `game_level_splits`, as the split report labels them.
pub const GAME_LEVEL_COLUMNS: &[&str] = &[
    "Split", "W", "L", "W-L%", "ERA", "G", "GS", "GF", "CG", "SHO", "SV", "IP", "H", "R", "ER",
    "HR", "BB", "IBB", "SO", "HBP", "BK", "WP", "BF", "WHIP", "SO9", "SO/W",
];

pub const SPLITS_DATA_TABLE: &str = "splits_data";
pub const GAME_LEVEL_TABLE: &str = "game_level_splits";
pub const PITCHING_SPLITS_TABLE: &str = "pitching_splits";

/// Connection to one scrape job's SQLite file
pub struct StatsDatabase {
    pub(crate) conn: Connection,
}

impl StatsDatabase {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// In-memory database, used by tests
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Drop and recreate the two categorised split tables
    pub fn reset_split_tables(&mut self) -> Result<()> {
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {}", SPLITS_DATA_TABLE), [])?;
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {}", GAME_LEVEL_TABLE), [])?;

        self.conn
            .execute(&split_table_ddl(SPLITS_DATA_TABLE, SPLITS_DATA_COLUMNS), [])?;
        self.conn
            .execute(&split_table_ddl(GAME_LEVEL_TABLE, GAME_LEVEL_COLUMNS), [])?;

        debug!("Split tables created");
        Ok(())
    }

    /// Create the keyed pitching split table if it does not exist yet
    pub fn ensure_pitching_splits(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS pitching_splits (
                split_type TEXT NOT NULL,
                year INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (split_type, year)
            )",
            [],
        )?;
        Ok(())
    }

    /// Column names of `table` in declaration order
    pub fn column_names(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", super::quote_ident(table)))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }
}

fn split_table_ddl(table: &str, columns: &[&str]) -> String {
    let stats = columns
        .iter()
        .map(|c| format!("{} TEXT", super::quote_ident(c)))
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    category TEXT,\n    {},\n    capture_date TIMESTAMP\n)",
        table, stats
    )
}
