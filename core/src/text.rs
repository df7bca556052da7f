#![deny(missing_docs)]

//! # Description Text
//!
//! Link resolution and description assembly for extracted entities.

use crate::document::{Inline, RichText};
use url::Url;

/// Prefix of a list-derived description line.
pub const LIST_ITEM_MARKER: &str = "- ";

/// Resolves `href` against `base` (RFC 3986). Empty hrefs stay empty.
///
/// # Examples
/// ```
/// use botapi_core::text::resolve_href;
///
/// let base = "https://core.telegram.org/bots/api";
/// assert_eq!(resolve_href("#message", base), "https://core.telegram.org/bots/api#message");
/// assert_eq!(resolve_href("/bots/faq", base), "https://core.telegram.org/bots/faq");
/// ```
pub fn resolve_href(href: &str, base: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Appends `new` to `current`.
///
/// A blank line separates the parts when either side is a list fragment,
/// a single newline otherwise.
pub fn concat_description(current: &str, new: &str) -> String {
    let last_line = current.lines().last().unwrap_or("");
    let separator = if new.starts_with(LIST_ITEM_MARKER) || last_line.starts_with(LIST_ITEM_MARKER)
    {
        "\n\n"
    } else {
        "\n"
    };

    format!("{}{}{}", current, separator, new).trim().to_string()
}

/// Renders inline content, turning links into `[text](url)`.
pub fn render_rich_text(text: &RichText, base: &str) -> String {
    let rendered: String = text
        .0
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) | Inline::Emphasis(text) => text.clone(),
            Inline::Link { text, href } => {
                let link = resolve_href(href, base);
                if link.is_empty() || *text == link {
                    text.clone()
                } else {
                    format!("[{}]({})", text, link)
                }
            }
        })
        .collect();

    rendered.trim().to_string()
}

/// Renders list items as `- item` lines.
pub fn render_list(items: &[RichText], base: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", LIST_ITEM_MARKER, render_rich_text(item, base)))
        .collect::<Vec<_>>()
        .join("\n")
}
