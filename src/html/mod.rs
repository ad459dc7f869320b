//! HTML table discovery and parsing.
//!
//! - `discover`: find every `<table>` in a page, including tables the
//!   source site ships inside HTML comments, with the section heading that
//!   labels each one
//! - `parse`: turn one table's markup into a `Table`, flattening
//!   multi-level headers and expanding `colspan`/`rowspan`

pub mod discover;
pub mod parse;


pub use discover::{discover_tables, TableFragment};
pub use parse::{flatten_header, parse_table};

use scraper::Selector;

/// Compile one of the crate's fixed CSS selectors.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Collapse all runs of whitespace (including non-breaking spaces) to one space.
pub(crate) fn normalize_text<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let joined: String = pieces.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
