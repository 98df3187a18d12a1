//! Query parser.
//!
//! Parses a token stream into a [`Condition`] tree using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! or_expr    → and_expr [ "OR"? or_expr ]
//! and_expr   → not_expr [ "AND" and_expr ]
//! not_expr   → "NOT" not_expr | primary
//! primary    → "(" or_expr ")" | field_term | value
//! field_term → WORD ":" ( range | value )
//! range      → ( "[" | "{" ) bound "TO" bound ( "]" | "}" )
//! bound      → "*" | value
//! value      → WORD | QUOTED
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)` and range brackets
//! 2. Negation: `NOT`
//! 3. `AND` (explicit only)
//! 4. `OR` (explicit, or implicit between adjacent terms)
//!
//! Chains of `AND` or `OR` come out right-leaning: `a b c` is
//! `Or(a, Or(b, c))`.

use std::mem;

use crate::{
    ast::{Condition, fold_right},
    error::{QueryError, SyntaxError},
    lexer::{Token, TokenKind, tokenize},
};

/// Default limit on group and `NOT` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parenthesized groups and stacked `NOT`s.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Returns options with the given nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Recursive descent parser for query conditions.
struct Parser {
    /// Token stream to parse, ending with `Eof`.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// Current group/`NOT` nesting.
    depth: usize,
    /// Nesting limit.
    max_depth: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Token>, options: &ParseOptions) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Parses the token stream into a condition.
    fn parse(mut self) -> Result<Condition, SyntaxError> {
        if self.at_end() {
            return Err(SyntaxError::new("empty query"));
        }

        let condition = self.parse_or_expr()?;

        if !self.at_end() {
            return Err(SyntaxError::at("unexpected trailing input", self.offset()));
        }

        Ok(condition)
    }

    /// Parses: or_expr → and_expr [ "OR"? or_expr ]
    ///
    /// Operands are collected in a loop and folded from the right, which
    /// yields the same tree as recursing into `or_expr` for the right side.
    /// `Condition::or_chain` shares the fold.
    fn parse_or_expr(&mut self) -> Result<Condition, SyntaxError> {
        let first = self.parse_and_expr()?;
        let mut rest = Vec::new();

        loop {
            if self.check(&TokenKind::Or) {
                self.advance(); // consume OR
            } else if self.at_construct_end() {
                break;
            }
            // Anything else starts another operand: implicit OR.
            rest.push(self.parse_and_expr()?);
        }

        Ok(fold_right(first, rest, Condition::or))
    }

    /// Parses: and_expr → not_expr [ "AND" and_expr ]
    fn parse_and_expr(&mut self) -> Result<Condition, SyntaxError> {
        let first = self.parse_not_expr()?;
        let mut rest = Vec::new();

        while self.check(&TokenKind::And) {
            self.advance(); // consume AND
            rest.push(self.parse_not_expr()?);
        }

        Ok(fold_right(first, rest, Condition::and))
    }

    /// Parses: not_expr → "NOT" not_expr | primary
    fn parse_not_expr(&mut self) -> Result<Condition, SyntaxError> {
        if self.check(&TokenKind::Not) {
            let offset = self.offset();
            self.advance(); // consume NOT
            self.enter(offset)?;
            let inner = self.parse_not_expr()?;
            self.leave();
            return Ok(Condition::negate(inner));
        }

        self.parse_primary()
    }

    /// Parses: primary → "(" or_expr ")" | field_term | value
    fn parse_primary(&mut self) -> Result<Condition, SyntaxError> {
        if !self.check(&TokenKind::LParen) {
            return self.parse_term();
        }

        let offset = self.offset();
        self.advance(); // consume (
        self.enter(offset)?;
        let inner = self.parse_or_expr()?;
        self.leave();

        if !self.check(&TokenKind::RParen) {
            return Err(self.unexpected("expected ')' to close group"));
        }
        self.advance(); // consume )

        Ok(inner)
    }

    /// Parses a bare value or a `field:` term.
    fn parse_term(&mut self) -> Result<Condition, SyntaxError> {
        let Some(field) = self.field_prefix() else {
            let value = self.parse_value("expected a term")?;
            return Ok(Condition::term(value));
        };
        self.advance(); // consume WORD
        self.advance(); // consume :

        if self.check(&TokenKind::LBracket) || self.check(&TokenKind::LBrace) {
            return self.parse_range(field);
        }

        let value = self.parse_value(&format!("expected a value after '{field}:'"))?;
        Ok(Condition::matching(field, value))
    }

    /// Returns the field name if the next two tokens are `WORD ':'`.
    fn field_prefix(&self) -> Option<String> {
        match (self.peek_kind(0), self.peek_kind(1)) {
            (Some(TokenKind::Word(name)), Some(TokenKind::Colon)) => Some(name.clone()),
            _ => None,
        }
    }

    /// Parses: range → ( "[" | "{" ) bound "TO" bound ( "]" | "}" )
    fn parse_range(&mut self, field: String) -> Result<Condition, SyntaxError> {
        let include_start = self.check(&TokenKind::LBracket);
        self.advance(); // consume [ or {

        let start = self.parse_bound(&field)?;

        if !self.check(&TokenKind::To) {
            return Err(self.unexpected(&format!("expected 'TO' in range for '{field}'")));
        }
        self.advance(); // consume TO

        let end = self.parse_bound(&field)?;

        let include_end = match self.peek_kind(0) {
            Some(TokenKind::RBracket) => true,
            Some(TokenKind::RBrace) => false,
            _ => {
                return Err(self.unexpected(&format!("expected ']' or '}}' to close range for '{field}'")));
            }
        };
        self.advance(); // consume ] or }

        Ok(Condition::TimeRange {
            field,
            start,
            end,
            include_start,
            include_end,
        })
    }

    /// Parses: bound → "*" | value
    fn parse_bound(&mut self, field: &str) -> Result<Option<String>, SyntaxError> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return Ok(None);
        }

        self.parse_value(&format!("expected a range bound for '{field}'"))
            .map(Some)
    }

    /// Parses: value → WORD | QUOTED
    ///
    /// A `*` outside a range is the literal value `"*"`.
    fn parse_value(&mut self, expected: &str) -> Result<String, SyntaxError> {
        let value = match self.peek_kind(0) {
            Some(TokenKind::Word(text) | TokenKind::Quoted(text)) => text.clone(),
            Some(TokenKind::Star) => "*".to_string(),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance();
        Ok(value)
    }

    /// Records one level of nesting, failing past the limit.
    fn enter(&mut self, offset: usize) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::at(
                format!("query nesting exceeds maximum depth of {}", self.max_depth),
                offset,
            ));
        }
        Ok(())
    }

    /// Leaves one level of nesting.
    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Builds an error naming the current token.
    fn unexpected(&self, expected: &str) -> SyntaxError {
        let found = self
            .peek_kind(0)
            .map_or_else(|| "end of query".to_string(), ToString::to_string);
        SyntaxError::at(format!("{expected}, found {found}"), self.offset())
    }

    /// Checks if the current token ends the enclosing construct.
    fn at_construct_end(&self) -> bool {
        matches!(
            self.peek_kind(0),
            None | Some(
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Eof
            )
        )
    }

    /// Checks if all input has been consumed.
    fn at_end(&self) -> bool {
        matches!(self.peek_kind(0), None | Some(TokenKind::Eof))
    }

    /// Returns the kind of the token `ahead` positions from the cursor.
    fn peek_kind(&self, ahead: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + ahead).map(|t| &t.kind)
    }

    /// Returns the byte offset of the current token.
    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.offset)
    }

    /// Checks if the current token has the same kind as `kind`, ignoring text.
    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind(0)
            .is_some_and(|k| mem::discriminant(k) == mem::discriminant(kind))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into a condition tree with default options.
///
/// Returns the complete tree, or an error for empty or malformed input. A
/// partial tree is never returned.
pub fn parse(input: &str) -> Result<Condition, QueryError> {
    parse_with(input, &ParseOptions::default())
}

/// Parses a query string into a condition tree with explicit options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Condition, QueryError> {
    let result = tokenize(input)
        .map_err(QueryError::from)
        .and_then(|tokens| {
            tracing::debug!(tokens = tokens.len(), "tokenized query");
            Parser::new(tokens, options).parse().map_err(QueryError::from)
        });

    match &result {
        Ok(condition) => tracing::trace!(depth = condition.depth(), "parsed query"),
        Err(err) => tracing::debug!(error = %err, "rejected query"),
    }

    result
}
