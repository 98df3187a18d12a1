//! Implementation of `qs config`.

use std::process::ExitCode;

use qs_highlight::Syntax;

use crate::cli::context::CommandContext;

/// Shows where configuration came from and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let palette = ctx.palette;
    let config = &ctx.config;

    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.files.is_empty() {
        println!("{}", palette.dim("# no config files found, showing defaults"));
    } else {
        for path in &config.files {
            println!("{}", palette.dim(&format!("# {}", path.display())));
        }
    }
    print!("{}", palette.highlight(&toml, Syntax::Toml));

    for warning in config.validate() {
        eprintln!("{} {warning}", palette.warning("warning:"));
    }

    ExitCode::SUCCESS
}
