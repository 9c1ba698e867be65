//! `stackwire outputs` — Print the exported outputs of the stack.

use std::io::{self, Write};

use clap::Args;

use super::Context;
use crate::output::format_value;

/// Arguments for the `outputs` command.
#[derive(Args, Debug)]
pub struct OutputsArgs {
    /// Print secret outputs in plaintext.
    #[arg(long)]
    pub show_secrets: bool,

    /// Emit a JSON object instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `outputs` command.
///
/// # Errors
///
/// Returns an error if declaration fails.
pub fn execute(ctx: &Context, args: OutputsArgs) -> anyhow::Result<()> {
    run(ctx, &args, &mut io::stdout().lock())
}

fn run(ctx: &Context, args: &OutputsArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let (_, stack) = ctx.declare()?;
    if args.show_secrets {
        tracing::warn!(stack = %stack.name, "revealing secret outputs");
    }

    if args.json {
        let object: serde_json::Map<String, serde_json::Value> = stack
            .outputs
            .iter()
            .map(|(key, value)| {
                (
                    key.clone(),
                    serde_json::Value::String(format_value(value, args.show_secrets)),
                )
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&object)?)?;
        return Ok(());
    }

    let width = stack.outputs.keys().map(String::len).max().unwrap_or(0);
    writeln!(out, "Current stack outputs ({}):", stack.outputs.len())?;
    for (key, value) in &stack.outputs {
        writeln!(out, "    {key:<width$}  {}", format_value(value, args.show_secrets))?;
    }

    Ok(())
}
