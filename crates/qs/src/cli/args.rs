//! Clap argument definitions for the `qs` CLI.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI options.
#[derive(Parser, Debug)]
#[command(name = "qs", version)]
#[command(about = "Parse, check and inspect boolean query strings")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Rendering for parsed conditions.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Indented node-per-line tree
    Tree,
    /// Tagged JSON
    Json,
    /// Canonical query string
    Query,
}

/// Parser overrides shared by `parse` and `check`.
#[derive(Args, Debug, Clone, Default)]
pub struct ParserArgs {
    /// Maximum nesting of groups and NOT operators [default: 64]
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Arguments for `qs parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Output format [default: tree]
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<Format>,

    #[command(flatten)]
    /// Parser overrides.
    pub parser: ParserArgs,
}

/// Arguments for `qs check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Queries to validate
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Print nothing for valid queries
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(flatten)]
    /// Parser overrides.
    pub parser: ParserArgs,
}

/// Arguments for `qs tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    pub query: String,

    /// Output tokens as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `qs init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.qs.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `qs` subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse queries and print their condition trees
    #[command(after_help = "\
QUERY SYNTAX:
  term              Match a value in any field
  field:term        Match a value in one field
  \"a phrase\"        Quoted value, backslash escapes \\\" and \\\\
  a b               Either term (implicit OR)
  a AND b           Both terms
  a OR b            Either term
  NOT a             Negation
  (expr)            Grouping
  f:[a TO b]        Inclusive range, * for an open side
  f:{a TO b}        Exclusive range, brackets may be mixed

PRECEDENCE:
  NOT binds tighter than AND, AND tighter than OR.

EXAMPLES:
  qs parse 'title:guide AND NOT draft'
  qs parse --format json 'date:[\"2020-01-01\" TO *]'
  qs parse --format query 'a b (c AND d)'")]
    Parse(ParseCommand),

    /// Validate queries, reporting the first error in each
    Check(CheckCommand),

    /// Show the tokens a query lexes into
    Tokens(TokensCommand),

    /// Initialize qs configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,
}
