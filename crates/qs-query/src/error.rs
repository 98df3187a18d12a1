//! Error types for query lexing and parsing.
//!
//! Every failure of [`parse`](crate::parse) is a [`QueryError`], which wraps
//! either a [`LexError`] or a [`SyntaxError`]. Neither carries a partial tree.

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at position {position}")]
pub struct LexError {
    /// What went wrong.
    pub reason: String,
    /// Byte position in input where the error occurred.
    pub position: usize,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(reason: impl Into<String>, position: usize) -> Self {
        Self {
            reason: reason.into(),
            position,
        }
    }
}

/// Structural error raised by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}{}", at_position(.position))]
pub struct SyntaxError {
    /// What went wrong.
    pub reason: String,
    /// Byte offset of the offending token, when there is one.
    pub position: Option<usize>,
}

impl SyntaxError {
    /// Creates a syntax error without a position.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            position: None,
        }
    }

    /// Creates a syntax error pointing at a byte offset.
    pub fn at(reason: impl Into<String>, position: usize) -> Self {
        Self {
            reason: reason.into(),
            position: Some(position),
        }
    }
}

/// Formats the optional position suffix of a syntax error.
fn at_position(position: &Option<usize>) -> String {
    position.map_or_else(String::new, |pos| format!(" at position {pos}"))
}

/// Any error produced while turning a query string into a condition tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Tokenization failed.
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// The tokens do not form a valid query.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl QueryError {
    /// Returns the error reason without position or prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Lex(err) => &err.reason,
            Self::Syntax(err) => &err.reason,
        }
    }

    /// Returns the byte offset of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lex(err) => Some(err.position),
            Self::Syntax(err) => err.position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let reason = self.reason();
        match self {
            Self::Lex(_) if reason.contains("unterminated") => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            Self::Lex(_) if reason.contains("escape") => {
                Some("A backslash escapes the next character; use \\\\ for a literal backslash")
            }
            Self::Syntax(_) if reason.starts_with("expected 'TO'") => {
                Some("Ranges are written field:[start TO end], use * for an open side")
            }
            Self::Syntax(_) if reason.contains("close range") => {
                Some("Close an inclusive bound with ] or an exclusive bound with }")
            }
            Self::Syntax(_) if reason.starts_with("expected ')'") => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            Self::Syntax(_) if reason.contains("trailing") => {
                Some("Remove the unmatched closing bracket or parenthesis")
            }
            Self::Syntax(_) if reason.contains("maximum depth") => {
                Some("Flatten the query or raise the parser max_depth setting")
            }
            _ => None,
        }
    }

    /// Formats the error with the query and a position indicator.
    ///
    /// ```text
    /// query syntax error: unterminated quoted string
    ///   a "open
    ///     ^
    /// hint: Add a closing quote (") to complete the phrase
    /// ```
    pub fn render(&self, query: &str) -> String {
        let mut out = format!("query syntax error: {}\n", self.reason());
        out.push_str(&format!("  {query}\n"));

        if let Some(pos) = self.position() {
            // Column in characters, so multibyte input lines up.
            let column = query
                .char_indices()
                .take_while(|(idx, _)| *idx < pos)
                .count();
            out.push_str(&format!("  {}^\n", " ".repeat(column)));
        }

        if let Some(suggestion) = self.suggestion() {
            out.push_str(&format!("hint: {suggestion}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::from(LexError::new("unterminated quoted string", 2));
        assert_eq!(
            err.to_string(),
            "lex error: unterminated quoted string at position 2"
        );
    }

    #[test]
    fn syntax_error_display_with_and_without_position() {
        let err = QueryError::from(SyntaxError::at("expected 'TO' in range", 7));
        assert_eq!(
            err.to_string(),
            "syntax error: expected 'TO' in range at position 7"
        );

        let err = QueryError::from(SyntaxError::new("empty query"));
        assert_eq!(err.to_string(), "syntax error: empty query");
    }

    #[test]
    fn reason_and_position() {
        let err = QueryError::from(LexError::new("trailing escape character", 3));
        assert_eq!(err.reason(), "trailing escape character");
        assert_eq!(err.position(), Some(3));

        let err = QueryError::from(SyntaxError::new("empty query"));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn render_points_at_position() {
        let err = QueryError::from(LexError::new("unterminated quoted string", 2));
        let rendered = err.render("a \"open");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "query syntax error: unterminated quoted string");
        assert_eq!(lines[1], "  a \"open");
        assert_eq!(lines[2], "    ^");
        assert!(lines[3].starts_with("hint:"));
    }

    #[test]
    fn render_counts_characters_not_bytes() {
        let err = QueryError::from(SyntaxError::at("unexpected trailing input", 4));
        let rendered = err.render("éé)");
        assert!(rendered.contains("\n    ^\n"));
    }

    #[test]
    fn render_without_position_has_no_caret() {
        let err = QueryError::from(SyntaxError::new("empty query"));
        let rendered = err.render("");
        assert!(!rendered.contains('^'));
        assert!(!rendered.contains("hint:"));
    }

    #[test]
    fn paren_suggestion() {
        let err = QueryError::from(SyntaxError::at("expected ')' to close group", 5));
        assert!(err.suggestion().unwrap().contains("closing parenthesis"));
    }

    #[test]
    fn range_suggestions() {
        let err = QueryError::from(SyntaxError::at("expected 'TO' in range", 5));
        assert!(err.suggestion().unwrap().contains("TO"));

        let err = QueryError::from(SyntaxError::at("expected ']' or '}' to close range", 5));
        assert!(err.suggestion().unwrap().contains("exclusive"));
    }
}
