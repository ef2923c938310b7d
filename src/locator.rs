// src/locator.rs
//! Finds the part of a race page that holds the finishers.
//!
//! Two shapes exist in the wild: a `<pre>` block of fixed-width text, or an
//! HTML table. Lookups never fail hard; a page without the expected block
//! yields `None` and the adapter decides whether that is a parse error.

use scraper::{ElementRef, Html};

use crate::core::html::{
    attr_value, contains_tag, first_inner, inner_after_open_tag, next_tag_block_ci, opener, openers_ci, strip_tags,
    tag_blocks_ci,
};
use crate::core::sanitize::{normalize_entities, normalize_ws};
use crate::error::{Result, RrError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Raw inner markup of a `<pre>`. `mixed` when it carries child tags.
    PreformattedText { text: String, mixed: bool },
    /// Cell text of a results table.
    StructuredTable { header_row: Vec<String>, data_rows: Vec<Vec<String>> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableHint {
    /// Innermost table with the most rows (at least `min_rows`).
    Largest { min_rows: usize },
    /// The n-th `<table>` in document order, 0-based.
    Nth(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatHint {
    /// First `<pre>` in the document.
    Preformatted,
    /// The one `<pre>` carrying an `id`; none or several is a miss.
    PreformattedWithId,
    Table(TableHint),
}

pub fn locate_result_block(markup: &str, hint: FormatHint) -> Option<Block> {
    match hint {
        FormatHint::Preformatted => {
            let (s, e) = next_tag_block_ci(markup, "<pre", "</pre>", 0)?;
            Some(pre_block(&markup[s..e]))
        }
        FormatHint::PreformattedWithId => {
            let with_id: Vec<&str> = tag_blocks_ci(markup, "pre")
                .into_iter()
                .filter(|b| attr_value(opener(b), "id").is_some())
                .collect();
            match with_id.as_slice() {
                [only] => Some(pre_block(only)),
                _ => None,
            }
        }
        FormatHint::Table(th) => locate_table(markup, th),
    }
}

fn pre_block(block: &str) -> Block {
    let inner = inner_after_open_tag(block);
    let mixed = contains_tag(&inner);
    Block::PreformattedText { text: inner, mixed }
}

fn locate_table(markup: &str, hint: TableHint) -> Option<Block> {
    let doc = Html::parse_document(markup);
    let table_sel = selector!("table");
    let tables: Vec<ElementRef> = doc.select(table_sel).collect();

    let chosen = match hint {
        TableHint::Nth(n) => tables.get(n).copied()?,
        TableHint::Largest { min_rows } => tables
            .iter()
            .copied()
            .filter(|t| t.select(table_sel).next().is_none()) // leaf tables only
            .map(|t| (own_rows(t).len(), t))
            .filter(|(n, _)| *n >= min_rows.max(1))
            .max_by_key(|(n, _)| *n)
            .map(|(_, t)| t)?,
    };

    let mut rows = own_rows(chosen).into_iter();
    let header_row = rows.next()?;
    Some(Block::StructuredTable { header_row, data_rows: rows.collect() })
}

/// Rows of `table` itself, not of tables nested inside it.
fn own_rows(table: ElementRef) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    for row in table.descendants().filter_map(ElementRef::wrap) {
        if row.value().name() != "tr" {
            continue;
        }
        let owner = row
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == "table");
        if owner.map(|o| o.id()) != Some(table.id()) {
            continue;
        }
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "td" | "th"))
            .map(|c| normalize_ws(&c.text().collect::<String>()))
            .collect();
        if !cells.is_empty() {
            out.push(cells);
        }
    }
    out
}

/// Column-header text ahead of the first finisher.
///
/// Lines are taken up to, not including, the first whose trimmed text starts
/// with the rank `1`. Mixed-content blocks give an empty banner: escaping
/// their markup would mangle the header, and raw markup is never copied out.
pub fn banner(block: &Block) -> String {
    let Block::PreformattedText { text, mixed } = block else {
        return s!();
    };
    if *mixed {
        return s!();
    }
    let first_place = regex!(r"^\s*1\b");
    let mut lines = Vec::new();
    for line in text.lines() {
        if first_place.is_match(line) {
            return normalize_entities(&lines.join("\n"));
        }
        lines.push(line.trim_end_matches('\r'));
    }
    // no 1st-place line: nothing to head
    s!()
}

/// Lines of a `<pre>` block, markup included.
pub fn block_lines(block: &Block) -> Vec<&str> {
    match block {
        Block::PreformattedText { text, .. } => text.lines().collect(),
        Block::StructuredTable { .. } => Vec::new(),
    }
}

/// Value of `<meta name="Author" content="…">`: which results tool made the page.
pub fn author_identifier(markup: &str) -> Result<String> {
    for tag in openers_ci(markup, "meta") {
        let is_author = attr_value(tag, "name").is_some_and(|n| n.trim().eq_ignore_ascii_case("author"));
        if is_author {
            if let Some(content) = attr_value(tag, "content") {
                return Ok(normalize_entities(content.trim()));
            }
        }
    }
    Err(RrError::parse("no Author meta tag (results vendor unknown)"))
}

/// Whitespace-normalized text of the first `<tag>`.
pub fn first_heading(markup: &str, tag: &str) -> Option<String> {
    let text = normalize_entities(&strip_tags(first_inner(markup, tag)?));
    if text.is_empty() { None } else { Some(text) }
}

pub fn title_text(markup: &str) -> Option<String> {
    first_heading(markup, "title")
}
