//! Locate tables in a rendered page.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};
use serde::Serialize;

use super::{normalize_text, selector};

/// Marker the split report uses for its per-game tables.
const GAME_LEVEL_MARKER: &str = "Game-Level";

/// One table found on a page, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableFragment {
    /// Outer HTML of the `<table>` element.
    pub html: String,
    pub id: Option<String>,
    /// Text of the nearest preceding `h2`/`h3`, empty when there is none.
    pub category: String,
    pub game_level: bool,
    /// Found inside an HTML comment rather than the live DOM.
    pub from_comment: bool,
}

impl TableFragment {
    fn new(table: ElementRef<'_>, category: String, from_comment: bool) -> Self {
        let html = table.html();
        Self {
            game_level: html.contains(GAME_LEVEL_MARKER),
            id: table.value().attr("id").map(str::to_string),
            category,
            html,
            from_comment,
        }
    }
}

/// Every table in `page`, in document order.
///
/// Tables wrapped in HTML comments are parsed out of the comment and
/// reported at the comment's position.
pub fn discover_tables(page: &str) -> Vec<TableFragment> {
    let document = Html::parse_document(page);
    let tables = selector("table");
    let mut found = Vec::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Element(el) if el.name() == "table" => {
                if let Some(table) = ElementRef::wrap(node) {
                    found.push(TableFragment::new(table, heading_before(node), false));
                }
            }
            Node::Comment(comment) => {
                let text: &str = comment;
                if !text.contains("<table") {
                    continue;
                }
                let category = heading_before(node);
                let inner = Html::parse_fragment(text);
                for table in inner.select(&tables) {
                    found.push(TableFragment::new(table, category.clone(), true));
                }
            }
            _ => {}
        }
    }

    found
}

/// Text of the closest `h2`/`h3` that precedes `node`, looking at earlier
/// siblings first and then at the siblings of each enclosing element.
fn heading_before(node: NodeRef<'_, Node>) -> String {
    let headings = selector("h2, h3");
    let mut current = Some(node);

    while let Some(n) = current {
        for sibling in n.prev_siblings() {
            let Some(el) = ElementRef::wrap(sibling) else {
                continue;
            };
            if matches!(el.value().name(), "h2" | "h3") {
                return normalize_text(el.text());
            }
            if let Some(inner) = el.select(&headings).last() {
                return normalize_text(inner.text());
            }
        }

        current = n.parent().filter(|p| {
            !matches!(p.value(), Node::Element(el) if el.name() == "body" || el.name() == "html")
        });
    }

    String::new()
}
