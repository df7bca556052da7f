#![deny(missing_docs)]

//! # Document Blocks
//!
//! The block-level view of the reference page consumed by the walker: the
//! immediate children of the page's content container, each tagged with its
//! structural kind. Inline content keeps hyperlinks and emphasis apart from
//! plain text so descriptions can be rendered with links and discriminator
//! values can be spotted.

use std::fmt;

/// Heading depth that drives the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// Section heading: switches the current category.
    Major,
    /// Entity heading: starts a type, method or version record.
    Minor,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::Major => write!(f, "h3"),
            HeadingLevel::Minor => write!(f, "h4"),
        }
    }
}

/// The anchor element embedded in a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The anchor's `name` attribute (e.g. `sendmessage`).
    pub name: String,
    /// The anchor's `href` attribute (e.g. `#sendmessage`), possibly empty.
    pub href: String,
}

/// A run of inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// A hyperlink.
    Link {
        /// Visible text.
        text: String,
        /// Raw `href` attribute.
        href: String,
    },
    /// Emphasised text (`<em>`).
    Emphasis(String),
}

/// Inline content of a paragraph, list item or table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText(pub Vec<Inline>);

impl RichText {
    /// Visible text with markup dropped.
    pub fn plain(&self) -> String {
        self.0
            .iter()
            .map(|inline| match inline {
                Inline::Text(text) | Inline::Emphasis(text) | Inline::Link { text, .. } => {
                    text.as_str()
                }
            })
            .collect()
    }

    /// Text with emphasis and links rendered back as HTML tags.
    pub fn markup(&self) -> String {
        self.0
            .iter()
            .map(|inline| match inline {
                Inline::Text(text) => text.clone(),
                Inline::Emphasis(text) => format!("<em>{}</em>", text),
                Inline::Link { text, href } => format!("<a href=\"{}\">{}</a>", href, text),
            })
            .collect()
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText(vec![Inline::Text(text.to_string())])
    }
}

/// A block-level element of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `h3` / `h4`.
    Heading {
        /// Depth of the heading.
        level: HeadingLevel,
        /// Visible heading text.
        text: String,
        /// Embedded anchor, when present.
        anchor: Option<Anchor>,
    },
    /// `p`
    Paragraph(RichText),
    /// `ul` / `ol`, one entry per item.
    List(Vec<RichText>),
    /// `table`, body rows of cells.
    Table(Vec<Vec<RichText>>),
    /// Anything else; ignored by the walker.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RichText {
        RichText(vec![
            Inline::Text("Type of the chat, must be ".into()),
            Inline::Emphasis("private".into()),
            Inline::Text(", see ".into()),
            Inline::Link {
                text: "Chat".into(),
                href: "#chat".into(),
            },
        ])
    }

    #[test]
    fn test_plain_drops_markup() {
        assert_eq!(sample().plain(), "Type of the chat, must be private, see Chat");
    }

    #[test]
    fn test_markup_keeps_tags() {
        assert_eq!(
            sample().markup(),
            "Type of the chat, must be <em>private</em>, see <a href=\"#chat\">Chat</a>"
        );
    }
}
