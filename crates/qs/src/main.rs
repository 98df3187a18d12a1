//! Command-line interface for the `qs` query tool.

use std::process::ExitCode;

use clap::Parser;
use qs::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
    logging::init_logging,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // init must work even when an existing config file is broken.
    let loaded = if matches!(cli.command, Commands::Init(_)) {
        CommandContext::load_cwd_only(cli.no_color)
    } else {
        CommandContext::load(cli.no_color)
    };
    let ctx = match loaded {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    init_logging(cli.verbose, &ctx.config.log.level, ctx.palette.enabled());
    if !matches!(cli.command, Commands::Config) {
        ctx.log_config_warnings();
    }

    commands::run(cli.command, &ctx)
}
