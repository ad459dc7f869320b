//! Categorised split tables and the keyed pitching split table

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{
    models::PitchingSplitRow,
    queries::{cell_value, value_to_string},
    quote_ident,
    schema::{
        StatsDatabase, GAME_LEVEL_COLUMNS, GAME_LEVEL_TABLE, PITCHING_SPLITS_TABLE,
        SPLITS_DATA_COLUMNS, SPLITS_DATA_TABLE,
    },
};
use crate::table::Table;
use anyhow::{bail, Context, Result};
use rusqlite::{params, params_from_iter, types::Value};
use tracing::warn;

/// Leading columns every pitching split table row must carry, in order.
pub const PITCHING_SPLIT_KEY: [&str; 2] = ["split_type", "year"];

/// Target table for a scraped split table.
pub fn split_table_for(game_level: bool) -> &'static str {
    if game_level {
        GAME_LEVEL_TABLE
    } else {
        SPLITS_DATA_TABLE
    }
}

impl StatsDatabase {
    /// Append a scraped split table under `category`.
    ///
    /// Only columns present in the target schema are written; the rest are
    /// reported and dropped. Returns the number of rows inserted.
    pub fn append_splits(
        &mut self,
        category: &str,
        table: &Table,
        game_level: bool,
        captured_at: &str,
    ) -> Result<usize> {
        let target = split_table_for(game_level);
        let schema = if game_level {
            GAME_LEVEL_COLUMNS
        } else {
            SPLITS_DATA_COLUMNS
        };

        let (kept, dropped): (Vec<usize>, Vec<usize>) =
            (0..table.columns.len()).partition(|&i| schema.contains(&table.columns[i].as_str()));
        if kept.is_empty() {
            bail!(
                "none of the columns {:?} exist in {}",
                table.columns,
                target
            );
        }
        if !dropped.is_empty() {
            let names: Vec<&str> = dropped.iter().map(|&i| table.columns[i].as_str()).collect();
            warn!(table = target, columns = ?names, "Dropping columns not in schema");
        }

        let mut columns = vec![quote_ident("category")];
        columns.extend(kept.iter().map(|&i| quote_ident(&table.columns[i])));
        columns.push(quote_ident("capture_date"));
        let placeholders = vec!["?"; columns.len()].join(", ");

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                target,
                columns.join(", "),
                placeholders
            ))?;
            for row in &table.rows {
                let values = std::iter::once(Some(category))
                    .chain(kept.iter().map(|&i| cell_value(&row[i])))
                    .chain(std::iter::once(Some(captured_at)));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        Ok(table.len())
    }

    /// Rows stored in `table` for `category`
    pub fn count_category(&self, table: &str, category: &str) -> Result<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE category = ?", quote_ident(table)),
            params![category],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }

    /// Insert or merge rows keyed by `(split_type, year)`.
    ///
    /// The table's first two columns must be `split_type` and `year`. Stat
    /// columns the database has not seen yet are added on the fly. An
    /// existing row keeps its value for any column this table leaves empty.
    pub fn upsert_pitching_splits(&mut self, table: &Table) -> Result<usize> {
        if table.columns.len() < 2 || table.columns[..2] != PITCHING_SPLIT_KEY {
            bail!(
                "pitching split rows must start with {:?}, got {:?}",
                PITCHING_SPLIT_KEY,
                table.columns
            );
        }
        self.ensure_pitching_splits()?;

        let existing = self.column_names(PITCHING_SPLITS_TABLE)?;
        let stat_columns = &table.columns[2..];
        for column in stat_columns {
            if !existing.contains(column) {
                self.conn.execute(
                    &format!(
                        "ALTER TABLE {} ADD COLUMN {} TEXT",
                        PITCHING_SPLITS_TABLE,
                        quote_ident(column)
                    ),
                    [],
                )?;
            }
        }

        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
        let quoted: Vec<String> = stat_columns.iter().map(|c| quote_ident(c)).collect();
        let mut insert_columns = vec!["split_type".to_string(), "year".to_string()];
        insert_columns.extend(quoted.iter().cloned());
        insert_columns.push("updated_at".to_string());
        let placeholders = vec!["?"; insert_columns.len()].join(", ");
        let updates = quoted
            .iter()
            .map(|c| format!("{c} = COALESCE(excluded.{c}, {c})"))
            .chain(std::iter::once("updated_at = excluded.updated_at".to_string()))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})
             ON CONFLICT(split_type, year) DO UPDATE SET {}",
            PITCHING_SPLITS_TABLE,
            insert_columns.join(", "),
            placeholders,
            updates
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &table.rows {
                let year: i64 = row[1]
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid year {:?}", row[1]))?;

                let mut values: Vec<Value> = Vec::with_capacity(insert_columns.len());
                values.push(Value::Text(row[0].clone()));
                values.push(Value::Integer(year));
                for cell in &row[2..] {
                    values.push(match cell_value(cell) {
                        Some(text) => Value::Text(text.to_string()),
                        None => Value::Null,
                    });
                }
                values.push(Value::Integer(now));
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;

        Ok(table.len())
    }

    /// All pitching split rows, ordered by year then split type
    pub fn pitching_split_rows(&self) -> Result<Vec<PitchingSplitRow>> {
        let columns = self.column_names(PITCHING_SPLITS_TABLE)?;
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY year, split_type",
            PITCHING_SPLITS_TABLE
        ))?;
        let mut cursor = stmt.query([])?;

        let mut result = Vec::new();
        while let Some(row) = cursor.next()? {
            let mut stats = BTreeMap::new();
            let mut split_type = String::new();
            let mut year = 0u16;

            for (i, name) in columns.iter().enumerate() {
                match name.as_str() {
                    "split_type" => split_type = row.get(i)?,
                    "year" => year = row.get(i)?,
                    "updated_at" => {}
                    _ => {
                        let value = value_to_string(row.get_ref(i)?);
                        if !value.is_empty() {
                            stats.insert(name.clone(), value);
                        }
                    }
                }
            }

            result.push(PitchingSplitRow {
                split_type,
                year,
                stats,
            });
        }
        Ok(result)
    }
}
