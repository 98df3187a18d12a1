//! Rendering and JSON serialization for CLI output.

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use qs_highlight::{Palette, Syntax};
use qs_query::{Condition, QueryError, Token};
use serde::{Serialize, ser::Error as _};

use crate::cli::args::Format;

/// Deepest condition tree rendered as JSON; serialization recurses per level.
pub const MAX_JSON_DEPTH: usize = 1024;

/// One entry of multi-query JSON output.
#[derive(Serialize)]
struct JsonParsedQuery<'a> {
    /// The query as given.
    query: &'a str,
    /// Its condition tree.
    condition: &'a Condition,
}

/// JSON form of a token.
#[derive(Serialize)]
struct JsonToken<'a> {
    /// Byte offset in the query.
    offset: usize,
    /// Upper-case kind name.
    kind: &'static str,
    /// Decoded text for words and quoted strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

impl<'a> From<&'a Token> for JsonToken<'a> {
    fn from(token: &'a Token) -> Self {
        Self {
            offset: token.offset,
            kind: token.kind.name(),
            text: token.kind.text(),
        }
    }
}

/// Renders one condition in the chosen format, with a trailing newline.
pub fn render_condition(
    condition: &Condition,
    format: Format,
    palette: Palette,
) -> Result<String, serde_json::Error> {
    Ok(match format {
        Format::Tree => condition.to_string(),
        Format::Query => format!("{}\n", condition.to_query_string()),
        Format::Json => {
            check_json_depth(condition)?;
            let json = serde_json::to_string_pretty(condition)?;
            format!("{}\n", palette.highlight(&json, Syntax::Json))
        }
    })
}

/// Renders several parsed queries as one JSON array.
pub fn render_json_batch(
    parsed: &[(&str, Condition)],
    palette: Palette,
) -> Result<String, serde_json::Error> {
    for (_, condition) in parsed {
        check_json_depth(condition)?;
    }
    let entries: Vec<JsonParsedQuery<'_>> = parsed
        .iter()
        .map(|(query, condition)| JsonParsedQuery { query, condition })
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;
    Ok(format!("{}\n", palette.highlight(&json, Syntax::Json)))
}

/// Refuses trees too deep to serialize without exhausting the stack.
fn check_json_depth(condition: &Condition) -> Result<(), serde_json::Error> {
    let depth = condition.depth();
    if depth > MAX_JSON_DEPTH {
        return Err(serde_json::Error::custom(format!(
            "condition tree is {depth} levels deep; JSON output supports at most {MAX_JSON_DEPTH}"
        )));
    }
    Ok(())
}

/// Renders a query error with the message in red and the hint dimmed.
pub fn render_error(err: &QueryError, query: &str, palette: Palette) -> String {
    let mut out = String::new();
    for line in err.render(query).lines() {
        let styled = if line.starts_with("query syntax error:") {
            palette.error(line)
        } else if line.starts_with("hint:") {
            palette.dim(line)
        } else {
            line.to_string()
        };
        out.push_str(&styled);
        out.push('\n');
    }
    out
}

/// Builds the token listing table.
pub fn tokens_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Offset", "Kind", "Text"]);
    for token in tokens {
        table.add_row(vec![
            Cell::new(token.offset),
            Cell::new(token.kind.name()),
            Cell::new(token.kind.text().unwrap_or("")),
        ]);
    }
    table
}

/// Serializes tokens as a JSON array.
pub fn tokens_json(tokens: &[Token]) -> Result<String, serde_json::Error> {
    let entries: Vec<JsonToken<'_>> = tokens.iter().map(JsonToken::from).collect();
    serde_json::to_string_pretty(&entries)
}
