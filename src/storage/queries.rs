//! Whole-table operations

use super::{quote_ident, schema::StatsDatabase};
use crate::table::Table;
use anyhow::{bail, Result};
use rusqlite::{params_from_iter, types::ValueRef};

/// Render any stored SQLite value as cell text; NULL becomes empty.
pub(crate) fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Empty cells are stored as NULL.
pub(crate) fn cell_value(cell: &str) -> Option<&str> {
    if cell.is_empty() {
        None
    } else {
        Some(cell)
    }
}

impl StatsDatabase {
    /// Drop `name` if it exists, recreate it with one TEXT column per table
    /// column, and insert every row. Returns the number of rows written.
    pub fn replace_table(&mut self, name: &str, table: &Table) -> Result<usize> {
        if table.columns.is_empty() {
            bail!("table {} has no columns", name);
        }

        let ident = quote_ident(name);
        let columns: Vec<String> = table.columns.iter().map(|c| quote_ident(c)).collect();
        let definitions = columns
            .iter()
            .map(|c| format!("{} TEXT", c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", ident), [])?;
        tx.execute(&format!("CREATE TABLE {} ({})", ident, definitions), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {} ({}) VALUES ({})",
                ident,
                columns.join(", "),
                placeholders
            ))?;
            for row in &table.rows {
                stmt.execute(params_from_iter(row.iter().map(|c| cell_value(c))))?;
            }
        }
        tx.commit()?;

        Ok(table.len())
    }

    /// User tables in creation order
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Read a whole table back as text cells
    pub fn read_table(&self, name: &str) -> Result<Table> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {}", quote_ident(name)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(value_to_string(row.get_ref(i)?));
            }
            rows.push(cells);
        }

        Ok(Table::new(columns, rows))
    }

    /// Number of rows in `name`
    pub fn row_count(&self, name: &str) -> Result<u64> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(name)),
            [],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }
}
