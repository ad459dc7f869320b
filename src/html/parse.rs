//! Parse one `<table>` into a `Table`.

use scraper::{ElementRef, Html, Node};
use tracing::debug;

use super::{normalize_text, selector};
use crate::{table::Table, Result, ScrapeError};

/// Upper bound on `colspan`/`rowspan`; anything larger is treated as a typo.
const MAX_SPAN: usize = 1000;

/// Row classes the source sites use for repeated header rows and spacers
/// inside the table body.
const SKIPPED_ROW_CLASSES: &[&str] = &["thead", "spacer"];

#[derive(Debug, Clone)]
struct RawCell {
    text: String,
    colspan: usize,
    rowspan: usize,
    header: bool,
}

#[derive(Debug)]
struct RawRow {
    cells: Vec<RawCell>,
    in_thead: bool,
    skipped: bool,
}

fn span(el: &ElementRef<'_>, attr: &str) -> usize {
    el.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n.min(MAX_SPAN))
        .unwrap_or(1)
}

/// Whether `row` belongs to `table` directly rather than to a nested table.
fn owned_by(row: &ElementRef<'_>, table: &ElementRef<'_>) -> bool {
    row.ancestors()
        .find(|a| matches!(a.value(), Node::Element(el) if el.name() == "table"))
        .map(|a| a.id() == table.id())
        .unwrap_or(false)
}

fn collect_rows(table: &ElementRef<'_>) -> Vec<RawRow> {
    let rows = selector("tr");
    table
        .select(&rows)
        .filter(|row| owned_by(row, table))
        .map(|row| {
            let in_thead = row
                .parent()
                .and_then(ElementRef::wrap)
                .map(|p| p.value().name() == "thead")
                .unwrap_or(false);
            let skipped = row
                .value()
                .classes()
                .any(|c| SKIPPED_ROW_CLASSES.contains(&c));
            let cells = row
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| matches!(c.value().name(), "th" | "td"))
                .map(|c| RawCell {
                    text: normalize_text(c.text()),
                    colspan: span(&c, "colspan"),
                    rowspan: span(&c, "rowspan"),
                    header: c.value().name() == "th",
                })
                .collect();
            RawRow {
                cells,
                in_thead,
                skipped,
            }
        })
        .collect()
}

/// Lay cells out on a grid, repeating spanned cells into every slot they cover.
fn expand_spans(rows: &[Vec<RawCell>]) -> Vec<Vec<String>> {
    let mut carry: Vec<Option<(usize, String)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out = Vec::new();
        let mut cells = row.iter();
        let mut col = 0;

        loop {
            if let Some(slot) = carry.get_mut(col) {
                if let Some((left, text)) = slot.take() {
                    out.push(text.clone());
                    if left > 1 {
                        *slot = Some((left - 1, text));
                    }
                    col += 1;
                    continue;
                }
            }

            match cells.next() {
                Some(cell) => {
                    for _ in 0..cell.colspan {
                        out.push(cell.text.clone());
                        if cell.rowspan > 1 {
                            if carry.len() <= col {
                                carry.resize(col + 1, None);
                            }
                            carry[col] = Some((cell.rowspan - 1, cell.text.clone()));
                        }
                        col += 1;
                    }
                }
                None => {
                    if carry.iter().skip(col).any(Option::is_some) {
                        out.push(String::new());
                        col += 1;
                        continue;
                    }
                    break;
                }
            }
        }

        grid.push(out);
    }

    grid
}

/// Join the levels of a multi-level header into one column name.
///
/// Empty levels, placeholder levels (`Unnamed: ...`) and a level that
/// repeats the one above it are dropped; what remains is joined with `_`.
pub fn flatten_header(levels: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for level in levels {
        let level = level.trim();
        if level.is_empty() || level.starts_with("Unnamed") {
            continue;
        }
        if parts.last() == Some(&level) {
            continue;
        }
        parts.push(level);
    }
    parts.join("_")
}

/// Parse the first `<table>` in `html`.
///
/// Header rows come from `<thead>`, or from the leading rows made only of
/// `<th>` cells when the table has no `<thead>`. Repeated header rows and
/// spacer rows in the body are skipped, as are rows without cells.
pub fn parse_table(html: &str) -> Result<Table> {
    let fragment = Html::parse_fragment(html);
    let table = fragment
        .select(&selector("table"))
        .next()
        .ok_or(ScrapeError::NoTables)?;

    let rows = collect_rows(&table);
    let has_thead = rows.iter().any(|r| r.in_thead);

    let mut header_rows = Vec::new();
    let mut body_rows = Vec::new();
    let mut leading = true;
    for row in rows {
        if row.cells.is_empty() {
            continue;
        }
        let is_header = if has_thead {
            row.in_thead
        } else {
            leading && row.cells.iter().all(|c| c.header)
        };
        if !is_header {
            leading = false;
        }

        if is_header {
            header_rows.push(row.cells);
        } else if !row.skipped {
            body_rows.push(row.cells);
        }
    }

    if header_rows.is_empty() && body_rows.is_empty() {
        return Err(ScrapeError::EmptyTable);
    }

    let header_grid = expand_spans(&header_rows);
    let body_grid = expand_spans(&body_rows);
    let width = header_grid
        .iter()
        .chain(body_grid.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let columns = (0..width)
        .map(|j| {
            let levels: Vec<String> = header_grid
                .iter()
                .map(|level| level.get(j).cloned().unwrap_or_default())
                .collect();
            match flatten_header(&levels) {
                name if name.is_empty() => format!("col_{}", j + 1),
                name => name,
            }
        })
        .collect();

    let body_grid: Vec<Vec<String>> = body_grid
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    let table = Table::new(columns, body_grid);
    debug!(shape = ?table.shape(), columns = ?table.columns, "Extracted table");
    Ok(table)
}
