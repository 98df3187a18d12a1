//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. Escapes and
//! quotes are resolved here, so `Word` and `Quoted` tokens carry decoded text.

use std::{fmt, iter::Peekable, str::Chars};

use crate::error::LexError;

/// The kind of a token, with decoded text for words and quoted strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word, with escapes resolved.
    Word(String),

    /// A double-quoted string (quotes stripped, escapes resolved).
    Quoted(String),

    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// The NOT keyword.
    Not,

    /// The TO keyword separating range bounds.
    To,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Inclusive range opener `[`.
    LBracket,

    /// Inclusive range closer `]`.
    RBracket,

    /// Exclusive range opener `{`.
    LBrace,

    /// Exclusive range closer `}`.
    RBrace,

    /// Field separator `:`.
    Colon,

    /// A standalone unescaped `*`.
    Star,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns the upper-case name of this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Word(_) => "WORD",
            Self::Quoted(_) => "QUOTED_STRING",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::To => "TO",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Colon => "COLON",
            Self::Star => "STAR",
            Self::Eof => "EOF",
        }
    }

    /// Returns the decoded text of a word or quoted string.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Word(text) | Self::Quoted(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(text) => write!(f, "word {text:?}"),
            Self::Quoted(text) => write!(f, "quoted string \"{text}\""),
            Self::And => write!(f, "'AND'"),
            Self::Or => write!(f, "'OR'"),
            Self::Not => write!(f, "'NOT'"),
            Self::To => write!(f, "'TO'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::Colon => write!(f, "':'"),
            Self::Star => write!(f, "'*'"),
            Self::Eof => write!(f, "end of query"),
        }
    }
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What was recognized.
    pub kind: TokenKind,
    /// Byte offset in the input where the token starts.
    pub offset: usize,
}

impl Token {
    /// Creates a token at the given byte offset.
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Returns true for characters that end a bare word.
///
/// The backslash is not listed: it starts an escape inside a word instead.
pub(crate) fn is_delimiter(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '(' | ')' | '[' | ']' | '{' | '}' | ':' | '"'
    )
}

/// Returns true if a bare word with this spelling would lex as something
/// other than a `Word` token.
pub(crate) fn is_reserved(word: &str) -> bool {
    reserved_kind(word).is_some()
}

/// Returns the keyword or star kind an unescaped bare word lexes as.
fn reserved_kind(word: &str) -> Option<TokenKind> {
    if word == "*" {
        Some(TokenKind::Star)
    } else if word.eq_ignore_ascii_case("AND") {
        Some(TokenKind::And)
    } else if word.eq_ignore_ascii_case("OR") {
        Some(TokenKind::Or)
    } else if word.eq_ignore_ascii_case("NOT") {
        Some(TokenKind::Not)
    } else if word.eq_ignore_ascii_case("TO") {
        Some(TokenKind::To)
    } else {
        None
    }
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    ///
    /// The returned sequence always ends with an `Eof` token.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token.
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.position;
        let Some(&ch) = self.chars.peek() else {
            return Ok(Token::new(TokenKind::Eof, start));
        };

        let punctuation = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ':' => TokenKind::Colon,
            '"' => return self.read_quoted(),
            _ => return self.read_word(),
        };

        self.advance();
        Ok(Token::new(punctuation, start))
    }

    /// Reads a double-quoted string.
    fn read_quoted(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Token::new(TokenKind::Quoted(content), start));
                }
                Some(&'\\') => content.push(self.read_escape()?),
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(LexError::new("unterminated quoted string", start));
                }
            }
        }
    }

    /// Reads a bare word, resolving escapes.
    ///
    /// Keywords and `*` are only recognized when the word contains no escapes.
    fn read_word(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut word = String::new();
        let mut escaped = false;

        while let Some(&ch) = self.chars.peek() {
            if ch == '\\' {
                word.push(self.read_escape()?);
                escaped = true;
                continue;
            }
            if is_delimiter(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        let reserved = if escaped { None } else { reserved_kind(&word) };
        let kind = reserved.unwrap_or(TokenKind::Word(word));
        Ok(Token::new(kind, start))
    }

    /// Consumes a backslash and returns the character it escapes.
    fn read_escape(&mut self) -> Result<char, LexError> {
        let start = self.position;
        self.advance(); // consume backslash

        match self.chars.peek() {
            Some(&ch) => {
                self.advance();
                Ok(ch)
            }
            None => Err(LexError::new("trailing escape character", start)),
        }
    }

    /// Skips spaces and tabs.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == ' ' || ch == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string into a sequence ending with `Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
