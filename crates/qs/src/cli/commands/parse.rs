//! Implementation of `qs parse`.

use std::process::ExitCode;

use qs_query::{Condition, parse_with};
use tracing::debug;

use crate::cli::{
    args::{Format, ParseCommand},
    context::CommandContext,
    output::{render_condition, render_error, render_json_batch},
};

/// Parses each query and prints its condition tree.
///
/// Every query is attempted; the exit code is a failure if any of them is
/// rejected.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let options = ctx.parse_options(&cmd.parser);
    let format = ctx.format(cmd.format);
    let palette = ctx.palette;
    debug!(?format, max_depth = options.max_depth, "parsing queries");

    let mut parsed: Vec<(&str, Condition)> = Vec::with_capacity(cmd.queries.len());
    let mut failed = false;
    for query in &cmd.queries {
        match parse_with(query, &options) {
            Ok(condition) => parsed.push((query.as_str(), condition)),
            Err(e) => {
                eprint!("{}", render_error(&e, query, palette));
                failed = true;
            }
        }
    }

    let rendered = if format == Format::Json && cmd.queries.len() > 1 {
        render_json_batch(&parsed, palette)
    } else {
        render_each(&parsed, format, ctx, cmd.queries.len() > 1)
    };

    match rendered {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            return ExitCode::FAILURE;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Renders conditions one after another, labelling trees when there are several.
fn render_each(
    parsed: &[(&str, Condition)],
    format: Format,
    ctx: &CommandContext,
    label: bool,
) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for (query, condition) in parsed {
        if label && format == Format::Tree {
            out.push_str(&ctx.palette.strong(query));
            out.push('\n');
        }
        out.push_str(&render_condition(condition, format, ctx.palette)?);
    }
    Ok(out)
}
