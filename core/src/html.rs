#![deny(missing_docs)]

//! # HTML Adapter
//!
//! Reads the reference page with `scraper` and flattens the children of its
//! content container into [`Block`]s.

use crate::document::{Anchor, Block, HeadingLevel, Inline, RichText};
use crate::error::{AppError, AppResult};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::Extraction(format!("invalid selector '{}': {:?}", css, e)))
}

fn anchor_selector() -> &'static Selector {
    static ANCHOR: OnceLock<Selector> = OnceLock::new();
    ANCHOR.get_or_init(|| Selector::parse("a.anchor, a[name]").expect("Invalid selector"))
}

fn body_row_selector() -> &'static Selector {
    static BODY_ROWS: OnceLock<Selector> = OnceLock::new();
    BODY_ROWS.get_or_init(|| Selector::parse("tbody > tr").expect("Invalid selector"))
}

fn row_selector() -> &'static Selector {
    static ROWS: OnceLock<Selector> = OnceLock::new();
    ROWS.get_or_init(|| Selector::parse("tr").expect("Invalid selector"))
}

/// Splits the element matched by `container_selector` into blocks.
///
/// Only element children are kept; loose text between them is dropped.
pub fn parse_blocks(html: &str, container_selector: &str) -> AppResult<Vec<Block>> {
    let document = Html::parse_document(html);
    let container_sel = selector(container_selector)?;

    let container = document.select(&container_sel).next().ok_or_else(|| {
        AppError::Extraction(format!(
            "content container '{}' not found in document",
            container_selector
        ))
    })?;

    Ok(container
        .children()
        .filter_map(ElementRef::wrap)
        .map(to_block)
        .collect())
}

fn to_block(element: ElementRef<'_>) -> Block {
    match element.value().name() {
        "h3" => heading(element, HeadingLevel::Major),
        "h4" => heading(element, HeadingLevel::Minor),
        "p" => Block::Paragraph(rich_text(element)),
        "ul" | "ol" => Block::List(
            element
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(rich_text)
                .collect(),
        ),
        "table" => Block::Table(table_rows(element)),
        _ => Block::Other,
    }
}

fn heading(element: ElementRef<'_>, level: HeadingLevel) -> Block {
    // An anchor without a name counts as no anchor at all.
    let anchor = element.select(anchor_selector()).next().and_then(|a| {
        a.value().attr("name").map(|name| Anchor {
            name: name.to_string(),
            href: a.value().attr("href").unwrap_or_default().to_string(),
        })
    });

    Block::Heading {
        level,
        text: element.text().collect::<String>().trim().to_string(),
        anchor,
    }
}

fn table_rows(table: ElementRef<'_>) -> Vec<Vec<RichText>> {
    let mut rows: Vec<ElementRef<'_>> = table.select(body_row_selector()).collect();
    if rows.is_empty() {
        rows = table.select(row_selector()).collect();
    }

    rows.into_iter()
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| cell.value().name() == "td")
                .map(rich_text)
                .collect::<Vec<_>>()
        })
        // Header rows only hold `th` cells.
        .filter(|cells| !cells.is_empty())
        .collect()
}

fn rich_text(element: ElementRef<'_>) -> RichText {
    let mut inlines = Vec::new();
    collect_inline(element, &mut inlines);
    RichText(inlines)
}

fn collect_inline(element: ElementRef<'_>, out: &mut Vec<Inline>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text: &str = text;
                push_text(out, text);
            }
            Node::Element(tag) => {
                let Some(nested) = ElementRef::wrap(child) else {
                    continue;
                };
                match (tag.name(), tag.attr("href")) {
                    ("br", _) => push_text(out, "\n"),
                    ("a", Some(href)) => out.push(Inline::Link {
                        text: nested.text().collect(),
                        href: href.to_string(),
                    }),
                    ("em", _) | ("i", _) => out.push(Inline::Emphasis(nested.text().collect())),
                    _ => collect_inline(nested, out),
                }
            }
            _ => {}
        }
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}
