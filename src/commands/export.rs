//! Export every table of a database into one Excel workbook.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tracing::info;

use super::common::resolve_path;
use crate::{storage::StatsDatabase, table::Table, Result};

pub const DEFAULT_WORKBOOK_NAME: &str = "baseball_data.xlsx";

/// Excel caps sheet names at 31 characters.
const MAX_SHEET_NAME: usize = 31;
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// A valid, unique worksheet name for `table_name`.
pub fn sheet_name(table_name: &str, taken: &mut HashSet<String>) -> String {
    let base: String = table_name
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .collect();
    let base = base.trim_matches('\'').to_string();
    let base = if base.is_empty() {
        "Sheet".to_string()
    } else {
        base
    };

    let mut candidate: String = base.chars().take(MAX_SHEET_NAME).collect();
    let mut n = 2;
    while taken.contains(&candidate.to_lowercase()) {
        let suffix = format!("_{}", n);
        candidate = base
            .chars()
            .take(MAX_SHEET_NAME - suffix.len())
            .chain(suffix.chars())
            .collect();
        n += 1;
    }
    taken.insert(candidate.to_lowercase());
    candidate
}

/// Numeric cells go into the sheet as numbers, everything else as text.
fn numeric_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn write_sheet(workbook: &mut Workbook, name: &str, table: &Table) -> Result<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    for (col, header) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let sheet_row = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            match numeric_cell(cell) {
                Some(number) => worksheet.write_number(sheet_row, col as u16, number)?,
                None => worksheet.write_string(sheet_row, col as u16, cell)?,
            };
        }
    }
    Ok(())
}

/// Write every table of `db` to its own sheet of `out`. Returns the sheet count.
pub fn export_workbook(db: &StatsDatabase, out: &Path) -> Result<usize> {
    let mut workbook = Workbook::new();
    let mut taken = HashSet::new();

    let names = db.table_names()?;
    for name in &names {
        let table = db.read_table(name)?;
        let sheet = sheet_name(name, &mut taken);
        write_sheet(&mut workbook, &sheet, &table)?;
        info!(table = %name, sheet = %sheet, rows = table.len(), "Exported table");
    }

    if names.is_empty() {
        // A workbook needs at least one sheet.
        workbook.add_worksheet();
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    workbook.save(out)?;
    Ok(names.len())
}

/// Handle `export`
pub fn handle_export(db_path: Option<PathBuf>, out: Option<PathBuf>, data_dir: &Path) -> Result<()> {
    let db_path = resolve_path(db_path, data_dir, super::leaderboard::DEFAULT_DB_NAME);
    let out = resolve_path(out, data_dir, DEFAULT_WORKBOOK_NAME);

    let db = StatsDatabase::open(&db_path)?;
    let sheets = export_workbook(&db, &out)?;
    println!("✓ Exported {} tables to {}", sheets, out.display());
    Ok(())
}
