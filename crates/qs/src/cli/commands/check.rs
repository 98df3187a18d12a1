//! Implementation of `qs check`.

use std::process::ExitCode;

use qs_query::parse_with;

use crate::cli::{args::CheckCommand, context::CommandContext, output::render_error};

/// Validates each query, printing `ok` or the rendered error.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    let options = ctx.parse_options(&cmd.parser);
    let palette = ctx.palette;

    let mut failures = 0;
    for query in &cmd.queries {
        match parse_with(query, &options) {
            Ok(_) if cmd.quiet => {}
            Ok(_) => println!("{} {query}", palette.success("ok")),
            Err(e) => {
                failures += 1;
                eprint!("{}", render_error(&e, query, palette));
            }
        }
    }

    if failures == 0 {
        return ExitCode::SUCCESS;
    }
    if cmd.queries.len() > 1 {
        eprintln!(
            "{}",
            palette.warning(&format!("{failures} of {} queries failed", cmd.queries.len()))
        );
    }
    ExitCode::FAILURE
}
