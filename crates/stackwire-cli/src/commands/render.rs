//! `stackwire render` — Write the JSON hand-off document.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use stackwire_compose::snapshot::Snapshot;

use super::Context;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Executes the `render` command.
///
/// Secrets appear only as markers, fingerprinted when the stack file sets
/// `encryptionsalt`.
///
/// # Errors
///
/// Returns an error if declaration fails or the file cannot be written.
pub fn execute(ctx: &Context, args: RenderArgs) -> anyhow::Result<()> {
    run(ctx, &args, &mut io::stdout().lock())
}

fn run(ctx: &Context, args: &RenderArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let (_, stack) = ctx.declare()?;
    let snapshot = Snapshot::capture(&stack)?;

    if let Some(ref path) = args.output {
        snapshot.save(path)?;
        tracing::info!(path = %path.display(), "snapshot written");
        writeln!(
            out,
            "Rendered {} resource(s) -> {}",
            snapshot.resources.len(),
            path.display()
        )?;
    } else {
        write!(out, "{}", snapshot.to_json()?)?;
    }

    Ok(())
}
