//! In-memory tabular record set and the cleaning steps applied before storage.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Result, ScrapeError};

/// A parsed statistics table: column names plus rows of cell text.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| ScrapeError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Make column names safe to use as SQL identifiers and sheet headers:
    /// `/` becomes `_`, blanks become `col_N`, duplicates get `_2`, `_3`, ...
    ///
    /// Names are compared case-insensitively, as SQLite compares identifiers.
    pub fn sanitize_columns(&mut self) {
        let mut taken: HashSet<String> = HashSet::new();
        for (i, column) in self.columns.iter_mut().enumerate() {
            let mut base = column.trim().replace('/', "_");
            if base.is_empty() {
                base = format!("col_{}", i + 1);
            }

            let mut name = base.clone();
            let mut n = 2;
            while taken.contains(&name.to_lowercase()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            taken.insert(name.to_lowercase());
            *column = name;
        }
    }

    /// Rename columns by exact match; unknown names are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for (from, to) in renames {
            if let Some(i) = self.column_index(from) {
                self.columns[i] = (*to).to_string();
            }
        }
    }

    /// Move `lead` columns to the front in the given order; the rest keep
    /// their relative order.
    pub fn reorder_columns(&mut self, lead: &[&str]) -> Result<()> {
        let mut order = Vec::with_capacity(self.columns.len());
        for name in lead {
            order.push(self.require_column(name)?);
        }
        let rest: Vec<usize> = (0..self.columns.len())
            .filter(|i| !order.contains(i))
            .collect();
        order.extend(rest);

        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in self.rows.iter_mut() {
            *row = order.iter().map(|&i| std::mem::take(&mut row[i])).collect();
        }
        Ok(())
    }

    /// Keep only rows whose `column` cell matches `pattern`.
    pub fn filter_rows(&mut self, column: &str, pattern: &Regex) -> Result<usize> {
        let col = self.require_column(column)?;
        let before = self.rows.len();
        self.rows.retain(|row| pattern.is_match(&row[col]));
        Ok(before - self.rows.len())
    }

    /// Insert a column holding the same value in every row.
    pub fn insert_constant_column(&mut self, at: usize, name: &str, value: &str) {
        let at = at.min(self.columns.len());
        self.columns.insert(at, name.to_string());
        for row in self.rows.iter_mut() {
            row.insert(at, value.to_string());
        }
    }
}
