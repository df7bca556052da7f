#![deny(missing_docs)]

//! # Type-Definition Grammar
//!
//! Turns free-text type descriptions found in the reference document
//! ("Array of Integer", "InputFile or String", "Array of A, B and C") into
//! canonical definition strings understood by the model's interning table:
//!
//! - scalars: `string`, `int32`, `int64`, `float`, `boolean`
//! - arrays: `array<elem|elem>`
//! - any-of groups: `_anyOfA|B` (only meaningful inside an array)
//! - everything else: an object name such as `Message`
//!
//! Splitting on `" or "` happens one level above [`parse`], in
//! [`split_alternatives`]; each alternative becomes its own admissible type.

/// Prefix marking an array of the remainder.
pub const ARRAY_PREFIX: &str = "Array of ";

/// Marker emitted in front of a comma-separated any-of group.
pub const ANY_OF_MARKER: &str = "_anyOf";

/// Suffix the caller appends to `Integer` when the companion text says
/// "64-bit integer".
pub const INTEGER64_HINT: &str = "64-bit integer";

/// Parses a single alternative into its canonical definition string.
///
/// Returns an empty string when nothing could be parsed.
///
/// # Examples
/// ```
/// use botapi_core::grammar::parse;
///
/// assert_eq!(parse("Array of PhotoSize"), "array<PhotoSize>");
/// assert_eq!(parse("Array of A and B"), "array<A|B>");
/// assert_eq!(parse("Integer"), "int32");
/// ```
pub fn parse(text: &str) -> String {
    let text = text.replace(" and ", ", ");

    if let Some(rest) = text.strip_prefix(ARRAY_PREFIX) {
        let items = parse(rest);
        let items = items.strip_prefix(ANY_OF_MARKER).unwrap_or(&items);
        if items.is_empty() {
            return "array".to_string();
        }
        return format!("array<{}>", items);
    }

    if text.contains(',') {
        let parts: Vec<String> = text
            .split(',')
            .map(parse)
            .filter(|def| !def.is_empty())
            .collect();
        return format!("{}{}", ANY_OF_MARKER, parts.join("|"));
    }

    rewrite_leaf(text.trim()).to_string()
}

/// Splits a type column on `" or "` and parses every alternative.
///
/// When the whole text is array-prefixed, later alternatives that are not
/// themselves array-prefixed inherit the prefix. Empty results are dropped.
pub fn split_alternatives(text: &str) -> Vec<String> {
    let is_array = text.starts_with(ARRAY_PREFIX);

    text.split(" or ")
        .enumerate()
        .map(|(idx, alt)| {
            if is_array && idx > 0 && !alt.trim_start().starts_with(ARRAY_PREFIX) {
                parse(&format!("{}{}", ARRAY_PREFIX, alt.trim_start()))
            } else {
                parse(alt)
            }
        })
        .filter(|def| !def.is_empty())
        .collect()
}

/// Rewrites `Integer` to the 64-bit marker when the companion cell says so.
///
/// This is the cross-column disambiguation the table readers perform before
/// handing the type cell to [`split_alternatives`].
pub fn apply_integer64_hint(type_text: &str, companion: &str) -> String {
    if type_text.contains("Integer") && companion.contains(INTEGER64_HINT) {
        type_text.replace("Integer", "Integer64")
    } else {
        type_text.to_string()
    }
}

/// Splits the inside of `array<...>` on `|`, honouring nested brackets.
pub fn split_array_elements(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);

    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn rewrite_leaf(name: &str) -> &str {
    match name {
        "True" | "False" | "Bool" | "Boolean" => "boolean",
        "Float number" | "Float" => "float",
        "Int" | "Integer" => "int32",
        "Integer64" => "int64",
        "String" => "string",
        "Messages" => "Message",
        other => other,
    }
}
