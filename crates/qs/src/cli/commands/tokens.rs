//! Implementation of `qs tokens`.

use std::process::ExitCode;

use qs_query::{QueryError, tokenize};

use crate::cli::{
    args::TokensCommand,
    context::CommandContext,
    output::{render_error, tokens_json, tokens_table},
};

/// Lists the tokens of a query.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let tokens = match tokenize(&cmd.query) {
        Ok(tokens) => tokens,
        Err(e) => {
            let err = QueryError::from(e);
            eprint!("{}", render_error(&err, &cmd.query, ctx.palette));
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        match tokens_json(&tokens) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", tokens_table(&tokens));
    }

    ExitCode::SUCCESS
}
