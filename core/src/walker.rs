#![deny(missing_docs)]

//! # Document Walker
//!
//! Single pass over the page blocks that turns headings, paragraphs, lists and
//! tables into a stream of [`Event`]s.
//!
//! The walker keeps a current category (last `h3` anchor) and a current draft
//! (last `h4`). A draft is emitted when the next heading starts, or when the
//! blocks run out. Lists inside a type emit [`Event::DeferredChild`] links
//! before the type itself is emitted; the consumer resolves them (see
//! [`crate::resolver`]).
//!
//! The walker is a plain `Iterator`: lazy, finite, not restartable. After an
//! [`Event::Error`] it yields nothing more.

use crate::config::SourceConfig;
use crate::document::{Anchor, Block, HeadingLevel, RichText};
use crate::error::{AppError, AppResult};
use crate::grammar::{apply_integer64_hint, split_alternatives};
use crate::model::{Argument, DataType, MethodEntity, Property, SpecBuilder, TypeEntity};
use crate::text::{concat_description, render_list, render_rich_text, resolve_href};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;

const PROPERTY_COLUMNS: usize = 3;
const ARGUMENT_COLUMNS: usize = 4;

/// Release facts read from the changelog section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRecord {
    /// Version number, e.g. `7.1`.
    pub version: String,
    /// Heading text, e.g. `December 29, 2023`.
    pub release_date: String,
    /// Absolute link to the changelog entry.
    pub link: String,
}

/// One step of the extraction.
#[derive(Debug)]
pub enum Event {
    /// A changelog entry.
    Version(VersionRecord),
    /// A completed type draft.
    Type(TypeEntity),
    /// A completed method draft.
    Method(MethodEntity),
    /// `parent` listed `child` as one of its subtypes.
    DeferredChild {
        /// Subtype name as listed.
        child: String,
        /// Listing type.
        parent: String,
    },
    /// Fatal structural problem; the walk stops here.
    Error(AppError),
}

enum Draft {
    Version(VersionRecord),
    Type(TypeEntity),
    Method(MethodEntity),
}

/// Shared, read-only helpers used while filling drafts.
#[derive(Clone, Copy)]
struct Context<'a> {
    builder: &'a SpecBuilder,
    config: &'a SourceConfig,
}

/// Lazy event stream over a sequence of blocks.
pub struct Walker<'a, I> {
    blocks: I,
    ctx: Context<'a>,
    category: String,
    draft: Option<Draft>,
    queue: VecDeque<Event>,
    finished: bool,
}

impl<'a, I> Walker<'a, I>
where
    I: Iterator<Item = Block>,
{
    /// Creates a walker. Data types met in tables are declared on `builder`.
    pub fn new(
        blocks: impl IntoIterator<IntoIter = I>,
        builder: &'a SpecBuilder,
        config: &'a SourceConfig,
    ) -> Self {
        Self {
            blocks: blocks.into_iter(),
            ctx: Context { builder, config },
            category: String::new(),
            draft: None,
            queue: VecDeque::new(),
            finished: false,
        }
    }

    fn step(&mut self, block: Block) -> AppResult<()> {
        let ctx = self.ctx;

        match block {
            Block::Heading {
                level,
                text,
                anchor,
            } => {
                let anchor = anchor.ok_or_else(|| {
                    AppError::Extraction(format!("detected node {} without anchor", level))
                })?;

                self.flush();
                match level {
                    HeadingLevel::Major => self.category = anchor.name,
                    HeadingLevel::Minor => {
                        self.draft = new_draft(ctx, &self.category, &anchor, text.trim())?
                    }
                }
            }
            Block::Paragraph(paragraph) => match &mut self.draft {
                Some(Draft::Version(record)) => fill_version(record, &paragraph),
                Some(Draft::Type(entity)) => {
                    let text = render_rich_text(&paragraph, &ctx.config.api_doc_url);
                    entity.description = concat_description(&entity.description, &text);
                }
                Some(Draft::Method(entity)) => fill_method_paragraph(ctx, entity, &paragraph),
                None => {}
            },
            Block::List(items) => {
                if let Some(Draft::Type(entity)) = &mut self.draft {
                    for item in &items {
                        let child = item.plain().trim().to_string();
                        if !child.is_empty() {
                            self.queue.push_back(Event::DeferredChild {
                                child,
                                parent: entity.name.clone(),
                            });
                        }
                    }
                    let text = render_list(&items, &ctx.config.api_doc_url);
                    entity.description = concat_description(&entity.description, &text);
                }
            }
            Block::Table(rows) => match &mut self.draft {
                Some(Draft::Type(entity)) => {
                    for row in &rows {
                        let property = read_property(ctx, &entity.name, row)?;
                        entity.properties.push(property);
                    }
                }
                Some(Draft::Method(entity)) => {
                    for row in &rows {
                        let argument = read_argument(ctx, &entity.name, row)?;
                        entity.arguments.push(argument);
                    }
                }
                _ => {}
            },
            Block::Other => {}
        }

        Ok(())
    }

    fn flush(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.queue.push_back(match draft {
                Draft::Version(record) => Event::Version(record),
                Draft::Type(entity) => Event::Type(entity),
                Draft::Method(entity) => Event::Method(entity),
            });
        }
    }

    fn fail(&mut self, err: AppError) {
        tracing::warn!(category = %self.category, "walk aborted: {}", err);
        self.draft = None;
        self.queue.push_back(Event::Error(err));
        self.finished = true;
    }
}

impl<'a, I> Iterator for Walker<'a, I>
where
    I: Iterator<Item = Block>,
{
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(event);
            }
            if self.finished {
                return None;
            }

            match self.blocks.next() {
                Some(block) => {
                    if let Err(err) = self.step(block) {
                        self.fail(err);
                    }
                }
                None => {
                    self.flush();
                    self.finished = true;
                }
            }
        }
    }
}

fn new_draft(
    ctx: Context<'_>,
    category: &str,
    anchor: &Anchor,
    name: &str,
) -> AppResult<Option<Draft>> {
    if category == ctx.config.changelog_category {
        return Ok(Some(Draft::Version(VersionRecord {
            version: String::new(),
            release_date: name.to_string(),
            link: resolve_href(&anchor.href, &ctx.config.changelog_url),
        })));
    }

    // Sub-sections such as "making-requests" carry no entity.
    if name.is_empty() || anchor.name.contains('-') {
        tracing::debug!(anchor = %anchor.name, "heading skipped");
        return Ok(None);
    }

    let link = resolve_href(&anchor.href, &ctx.config.api_doc_url);
    let draft = if name.chars().next().is_some_and(char::is_uppercase) {
        TypeEntity::new(category, name, &link).map(Draft::Type)
    } else {
        MethodEntity::new(category, name, &link).map(Draft::Method)
    };

    draft.map(Some).map_err(|e| {
        AppError::Extraction(format!("can't create new item '{}'. error: {}", name, e))
    })
}

fn fill_version(record: &mut VersionRecord, paragraph: &RichText) {
    if record.version.is_empty() {
        record.version = extract_version(&paragraph.plain());
    }
}

fn fill_method_paragraph(ctx: Context<'_>, entity: &mut MethodEntity, paragraph: &RichText) {
    if entity.description.is_empty() {
        let returns = extract_return_types(&paragraph.plain(), ctx.builder);
        entity.returns.extend(returns);
    }

    let text = render_rich_text(paragraph, &ctx.config.api_doc_url);
    entity.description = concat_description(&entity.description, &text);
}

fn read_property(ctx: Context<'_>, owner: &str, row: &[RichText]) -> AppResult<Property> {
    if row.len() != PROPERTY_COLUMNS {
        return Err(AppError::Extraction(format!(
            "can't parse properties of object '{}', expected {} columns but found {}",
            owner,
            PROPERTY_COLUMNS,
            row.len()
        )));
    }

    let mut property = Property::new(row[0].plain().trim()).map_err(|_| {
        AppError::Extraction(format!(
            "expecting property for object {}, but it's missed (column 0)",
            owner
        ))
    })?;

    let description = row[2].plain();
    let type_text = apply_integer64_hint(&row[1].plain(), &description);
    property.data_types = extract_types(&type_text, ctx.builder);
    if property.data_types.is_empty() {
        return Err(AppError::Extraction(format!(
            "can't parse data type for property '{}' of object '{}' (column 1)",
            property.name, owner
        )));
    }

    property.optional = description.trim_start().starts_with("Optional.");
    if !property.optional {
        property.predefined_value = extract_predefined_value(&row[2].markup());
    }
    property.description = render_rich_text(&row[2], &ctx.config.api_doc_url);

    Ok(property)
}

fn read_argument(ctx: Context<'_>, owner: &str, row: &[RichText]) -> AppResult<Argument> {
    if row.len() != ARGUMENT_COLUMNS {
        return Err(AppError::Extraction(format!(
            "can't parse arguments of method '{}', expected {} columns but found {}",
            owner,
            ARGUMENT_COLUMNS,
            row.len()
        )));
    }

    let mut argument = Argument::new(row[0].plain().trim()).map_err(|_| {
        AppError::Extraction(format!(
            "expecting argument for method {}, but it's missed (column 0)",
            owner
        ))
    })?;

    let type_text = apply_integer64_hint(&row[1].plain(), &row[3].plain());
    argument.data_types = extract_types(&type_text, ctx.builder);
    if argument.data_types.is_empty() {
        return Err(AppError::Extraction(format!(
            "can't parse data type for argument '{}' of method '{}' (column 1)",
            argument.name, owner
        )));
    }

    argument.required = row[2].plain().trim() == "Yes";
    argument.description = render_rich_text(&row[3], &ctx.config.api_doc_url);

    Ok(argument)
}

/// Splits a type column into alternatives and declares each of them.
pub fn extract_types(text: &str, builder: &SpecBuilder) -> Vec<DataType> {
    split_alternatives(text)
        .iter()
        .map(|definition| builder.declare_data_type(definition))
        .collect()
}

/// Reads `Bot API <version>` from a changelog paragraph.
///
/// Falls back to the whole (trimmed) paragraph when the pattern is absent.
pub fn extract_version(text: &str) -> String {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let version_re =
        VERSION_RE.get_or_init(|| Regex::new(r"Bot API ([\d.]+)").expect("Invalid regex"));

    version_re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .unwrap_or_else(|| text.trim().to_string())
}

/// Finds result types in the first paragraph of a method description.
///
/// Looks for "On success, ..." / "Returns ..." first and "An ... is returned"
/// second, then collects the capitalized words of the captured phrase.
pub fn extract_return_types(text: &str, builder: &SpecBuilder) -> Vec<DataType> {
    static SUCCESS_RE: OnceLock<Regex> = OnceLock::new();
    let success_re = SUCCESS_RE
        .get_or_init(|| Regex::new(r"(?i)(?:on success,|returns)([^.]*)").expect("Invalid regex"));

    static RETURNED_RE: OnceLock<Regex> = OnceLock::new();
    let returned_re = RETURNED_RE
        .get_or_init(|| Regex::new(r"(?i)(?:An)([^.]*)(?:is returned)").expect("Invalid regex"));

    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    let word_re = WORD_RE.get_or_init(|| Regex::new(r"\b[A-Z].*?\b").expect("Invalid regex"));

    static ARRAY_RE: OnceLock<Regex> = OnceLock::new();
    let array_re = ARRAY_RE.get_or_init(|| Regex::new(r"(?i)array of ").expect("Invalid regex"));

    let phrase = success_re
        .captures(text)
        .or_else(|| returned_re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("Array", "array"));

    let Some(phrase) = phrase else {
        return Vec::new();
    };

    let names: Vec<&str> = word_re.find_iter(&phrase).map(|m| m.as_str()).collect();
    if names.is_empty() {
        return Vec::new();
    }

    let (join, prefix) = if array_re.is_match(&phrase) {
        (", ", "Array of ")
    } else {
        (" or ", "")
    };

    extract_types(&format!("{}{}", prefix, names.join(join)), builder)
}

/// Extracts a fixed value from a description cell (best effort).
///
/// Recognizes `always “value”`, `always "value"` and `must be <em>value</em>`.
pub fn extract_predefined_value(markup: &str) -> Option<String> {
    static VALUE_RE: OnceLock<Regex> = OnceLock::new();
    let value_re = VALUE_RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:always [“"]|must be <em>)(\b[A-Z].*?\b)?"#).expect("Invalid regex")
    });

    value_re
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Inline;

    fn h3(name: &str) -> Block {
        Block::Heading {
            level: HeadingLevel::Major,
            text: name.to_string(),
            anchor: Some(Anchor {
                name: name.to_lowercase().replace(' ', "-"),
                href: format!("#{}", name.to_lowercase().replace(' ', "-")),
            }),
        }
    }

    fn h4(name: &str) -> Block {
        Block::Heading {
            level: HeadingLevel::Minor,
            text: name.to_string(),
            anchor: Some(Anchor {
                name: name.to_lowercase(),
                href: format!("#{}", name.to_lowercase()),
            }),
        }
    }

    fn p(text: &str) -> Block {
        Block::Paragraph(RichText::from(text))
    }

    fn row(cells: &[&str]) -> Vec<RichText> {
        cells.iter().map(|c| RichText::from(*c)).collect()
    }

    fn walk(blocks: Vec<Block>, builder: &SpecBuilder) -> Vec<Event> {
        let config = SourceConfig::default();
        Walker::new(blocks, builder, &config).collect()
    }

    #[test]
    fn test_type_with_properties() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Available types"),
                h4("User"),
                p("This object represents a Telegram user or bot."),
                Block::Table(vec![
                    row(&["id", "Integer", "Unique identifier. It has at most 52 significant bits, so a 64-bit integer is safe."]),
                    row(&["is_bot", "Boolean", "True, if this user is a bot"]),
                    row(&["username", "String", "Optional. User's or bot's username"]),
                ]),
            ],
            &builder,
        );

        assert_eq!(events.len(), 1);
        let Event::Type(user) = &events[0] else {
            panic!("expected a type, got {:?}", events[0]);
        };
        assert_eq!(user.category, "available-types");
        assert_eq!(user.link, "https://core.telegram.org/bots/api#user");
        assert_eq!(user.description, "This object represents a Telegram user or bot.");
        assert_eq!(user.properties.len(), 3);
        assert_eq!(user.properties[0].data_types[0].definition(), "int64");
        assert_eq!(user.properties[1].data_types[0].definition(), "boolean");
        assert!(!user.properties[1].optional);
        assert!(user.properties[2].optional);
    }

    #[test]
    fn test_method_with_arguments_and_returns() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Available methods"),
                h4("sendMessage"),
                p("Use this method to send text messages. On success, the sent Message is returned."),
                p("Second paragraph mentioning Returns True on success."),
                Block::Table(vec![
                    row(&["chat_id", "Integer or String", "Yes", "Unique identifier for the target chat"]),
                    row(&["text", "String", "Yes", "Text of the message to be sent"]),
                    row(&["disable_notification", "Boolean", "Optional", "Sends the message silently."]),
                ]),
            ],
            &builder,
        );

        let Event::Method(method) = &events[0] else {
            panic!("expected a method, got {:?}", events[0]);
        };
        let returns: Vec<&str> = method.returns.iter().map(|r| r.definition()).collect();
        assert_eq!(returns, vec!["Message"]);
        assert_eq!(
            method.description,
            "Use this method to send text messages. On success, the sent Message is returned.\nSecond paragraph mentioning Returns True on success."
        );

        let chat_id: Vec<&str> = method.arguments[0].data_types.iter().map(|d| d.definition()).collect();
        assert_eq!(chat_id, vec!["int32", "string"]);
        assert!(method.arguments[0].required);
        assert!(!method.arguments[2].required);
    }

    #[test]
    fn test_list_emits_deferred_children_before_parent() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Available types"),
                h4("BotCommandScope"),
                p("This object represents the scope. Currently, the following 2 scopes are supported:"),
                Block::List(vec![
                    RichText(vec![Inline::Link {
                        text: "BotCommandScopeDefault".into(),
                        href: "#botcommandscopedefault".into(),
                    }]),
                    RichText::from("BotCommandScopeChat"),
                ]),
            ],
            &builder,
        );

        assert!(matches!(&events[0], Event::DeferredChild { child, parent } if child == "BotCommandScopeDefault" && parent == "BotCommandScope"));
        assert!(matches!(&events[1], Event::DeferredChild { child, .. } if child == "BotCommandScopeChat"));
        let Event::Type(scope) = &events[2] else {
            panic!("expected a type");
        };
        assert_eq!(
            scope.description,
            "This object represents the scope. Currently, the following 2 scopes are supported:\n\n- [BotCommandScopeDefault](https://core.telegram.org/bots/api#botcommandscopedefault)\n- BotCommandScopeChat"
        );
    }

    #[test]
    fn test_changelog_version_record() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Recent changes"),
                Block::Heading {
                    level: HeadingLevel::Minor,
                    text: "December 29, 2023".into(),
                    anchor: Some(Anchor {
                        name: "december-29-2023".into(),
                        href: "#december-29-2023".into(),
                    }),
                },
                p("Bot API 7.0"),
                p("Bot API 6.9"),
            ],
            &builder,
        );

        let Event::Version(record) = &events[0] else {
            panic!("expected a version record");
        };
        assert_eq!(record.version, "7.0");
        assert_eq!(record.release_date, "December 29, 2023");
        assert_eq!(
            record.link,
            "https://core.telegram.org/bots/api-changelog#december-29-2023"
        );
    }

    #[test]
    fn test_heading_without_anchor_is_fatal() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Available types"),
                h4("User"),
                Block::Heading {
                    level: HeadingLevel::Minor,
                    text: "Chat".into(),
                    anchor: None,
                },
                h4("Message"),
            ],
            &builder,
        );

        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::Error(AppError::Extraction(msg)) => {
                assert_eq!(msg, "detected node h4 without anchor")
            }
            other => panic!("expected an error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_rows_are_fatal() {
        let cases = vec![
            (row(&["id", "Integer"]), "expected 3 columns but found 2"),
            (row(&["", "Integer", "Identifier"]), "(column 0)"),
            (row(&["id", "", "Identifier"]), "(column 1)"),
        ];

        for (bad_row, expected) in cases {
            let builder = SpecBuilder::new();
            let events = walk(
                vec![h3("Available types"), h4("User"), Block::Table(vec![bad_row])],
                &builder,
            );
            match events.last() {
                Some(Event::Error(err)) => {
                    let msg = err.to_string();
                    assert!(msg.contains(expected), "{}", msg);
                    assert!(msg.contains("User"), "{}", msg);
                }
                other => panic!("expected an error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_dashed_sections_are_skipped() {
        let builder = SpecBuilder::new();
        let events = walk(
            vec![
                h3("Making requests"),
                Block::Heading {
                    level: HeadingLevel::Minor,
                    text: "Using a Local Bot API Server".into(),
                    anchor: Some(Anchor {
                        name: "using-a-local-bot-api-server".into(),
                        href: "#using-a-local-bot-api-server".into(),
                    }),
                },
                p("The Bot API server source code is available."),
            ],
            &builder,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_return_type_phrases() {
        let builder = SpecBuilder::new();
        let defs = |text: &str| -> Vec<String> {
            extract_return_types(text, &builder)
                .iter()
                .map(|d| d.definition().to_string())
                .collect()
        };

        assert_eq!(defs("Returns True on success."), vec!["boolean"]);
        assert_eq!(
            defs("On success, an array of Update objects is returned."),
            vec!["array<Update>"]
        );
        assert_eq!(
            defs("On success, if the message is not an inline message, the edited Message is returned, otherwise True is returned."),
            vec!["Message", "boolean"]
        );
        assert_eq!(
            defs("Use this method to send a group of photos. On success, an array of Messages that were sent is returned."),
            vec!["array<Message>"]
        );
        assert_eq!(
            defs("A simple method for testing your bot. Returns basic information about the bot in form of a User object."),
            vec!["User"]
        );
        assert!(defs("Nothing to see here.").is_empty());
    }

    #[test]
    fn test_predefined_values() {
        assert_eq!(
            extract_predefined_value("The member's status in the chat, always “creator”"),
            Some("creator".to_string())
        );
        assert_eq!(
            extract_predefined_value("Type of the result, must be <em>article</em>"),
            Some("article".to_string())
        );
        assert_eq!(
            extract_predefined_value("Scope type, always \"default\""),
            Some("default".to_string())
        );
        assert_eq!(extract_predefined_value("Unique identifier for this user"), None);
    }

    #[test]
    fn test_version_fallback() {
        assert_eq!(extract_version("Bot API 7.1"), "7.1");
        assert_eq!(extract_version("We released Bot API 6.9."), "6.9");
        assert_eq!(extract_version("  Unversioned notes "), "Unversioned notes");
    }
}
