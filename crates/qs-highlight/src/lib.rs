//! Terminal coloring for qs output.
//!
//! Everything goes through a [`Palette`], which is either on or off. When off,
//! text passes through untouched, so piped output carries no escapes.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Resets all SGR attributes.
const RESET: &str = "\x1b[0m";

/// Languages qs prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Config files and `qs config` output.
    Toml,
    /// Condition trees and token listings.
    Json,
}

impl Syntax {
    /// File extension syntect knows the language by.
    fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }
}

/// Text roles with a fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    /// Bold, for labels.
    Strong,
    /// Faint, for comments and hints.
    Dim,
    /// Green.
    Success,
    /// Yellow.
    Warning,
    /// Red.
    Error,
}

impl Tone {
    /// SGR sequence that starts this tone.
    fn code(self) -> &'static str {
        match self {
            Self::Strong => "\x1b[1m",
            Self::Dim => "\x1b[2m",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

/// Syntax highlighter over the two-face language and theme sets (Dracula).
struct Highlighter {
    /// Language definitions; TOML comes from the two-face extras.
    syntax_set: SyntaxSet,
    /// Lazily loaded themes.
    theme_set: EmbeddedLazyThemeSet,
}

impl Highlighter {
    /// Loads the syntax and theme sets.
    fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
        }
    }

    /// Returns `content` with 24-bit color escapes, ending in a reset.
    fn highlight(&self, content: &str, syntax: Syntax) -> String {
        let definition = self
            .syntax_set
            .find_syntax_by_extension(syntax.extension())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let theme = self.theme_set.get(EmbeddedThemeName::Dracula);
        let mut lines = HighlightLines::new(definition, theme);

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }
}

/// Removes ANSI escape sequences from text.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequences end at the first byte in '@'..='~'.
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Applies colors only when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Whether ANSI escapes are emitted.
    enabled: bool,
}

impl Palette {
    /// Creates a palette.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Returns whether colors are emitted.
    pub fn enabled(self) -> bool {
        self.enabled
    }

    /// Wraps `text` in `tone` when enabled.
    fn paint(self, text: &str, tone: Tone) -> String {
        if self.enabled {
            format!("{}{text}{RESET}", tone.code())
        } else {
            text.to_string()
        }
    }

    /// Bold text.
    pub fn strong(self, text: &str) -> String {
        self.paint(text, Tone::Strong)
    }

    /// Faint text.
    pub fn dim(self, text: &str) -> String {
        self.paint(text, Tone::Dim)
    }

    /// Green text.
    pub fn success(self, text: &str) -> String {
        self.paint(text, Tone::Success)
    }

    /// Yellow text.
    pub fn warning(self, text: &str) -> String {
        self.paint(text, Tone::Warning)
    }

    /// Red text.
    pub fn error(self, text: &str) -> String {
        self.paint(text, Tone::Error)
    }

    /// Highlights `content` as `syntax` when enabled.
    pub fn highlight(self, content: &str, syntax: Syntax) -> String {
        if self.enabled {
            Highlighter::new().highlight(content, syntax)
        } else {
            content.to_string()
        }
    }
}
