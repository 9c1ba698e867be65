//! `stackwire config` — List the configuration of the active stack.

use std::io::{self, Write};

use clap::Args;
use stackwire_common::constants::SECRET_PLACEHOLDER;

use super::Context;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Executes the `config` command.
///
/// Secure values are always masked.
///
/// # Errors
///
/// Returns an error if the project or stack file cannot be read.
pub fn execute(ctx: &Context, _args: ConfigArgs) -> anyhow::Result<()> {
    run(ctx, &mut io::stdout().lock())
}

fn run(ctx: &Context, out: &mut impl Write) -> anyhow::Result<()> {
    let (project, config) = ctx.load_config()?;
    let entries = config.entries();

    writeln!(out, "Configuration of {}/{}", project.name, config.stack())?;
    if entries.is_empty() {
        writeln!(out, "    (no values)")?;
        return Ok(());
    }

    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    for entry in &entries {
        let value = if entry.secret {
            SECRET_PLACEHOLDER
        } else {
            entry.value.as_deref().unwrap_or("")
        };
        writeln!(out, "    {:<width$}  {value}", entry.key)?;
    }

    Ok(())
}
