//! `stackwire plan` — Display the resources that would be handed to the engine.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use stackwire_compose::snapshot::{Change, Snapshot, diff};

use super::Context;
use crate::output::{change_marker, describe, format_value, rule};

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Snapshot from a previous `render` to diff against.
    #[arg(long)]
    pub previous: Option<PathBuf>,
}

/// Executes the `plan` command.
///
/// Declares the stack, resolves the apply order, and prints every
/// resource in that order. With `--previous`, each resource is marked as
/// created, updated or unchanged and removed resources are listed.
///
/// # Errors
///
/// Returns an error if declaration fails or the previous snapshot cannot
/// be read.
pub fn execute(ctx: &Context, args: PlanArgs) -> anyhow::Result<()> {
    run(ctx, &args, &mut io::stdout().lock())
}

fn run(ctx: &Context, args: &PlanArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let (project, stack) = ctx.declare()?;
    let order = stack.apply_order()?;

    let changes = match args.previous {
        Some(ref path) => {
            let previous = Snapshot::load(path)?;
            if previous.stack != stack.name.as_str() {
                tracing::warn!(
                    previous = %previous.stack,
                    current = %stack.name,
                    "diffing against a snapshot of another stack"
                );
            }
            Some(diff(&previous, &Snapshot::capture(&stack)?))
        }
        None => None,
    };
    let change_for = |name: &str| {
        changes
            .as_ref()
            .and_then(|c| c.iter().find(|change| change.name() == name))
    };

    writeln!(out, "Plan for stack: {} (project {})", stack.name, project.name)?;
    writeln!(out, "{}", rule())?;
    writeln!(out)?;

    for name in &order {
        let Some(descriptor) = stack.get(name) else {
            continue;
        };
        let change = change_for(name.as_str());
        let suffix = match change {
            Some(Change::Update { fields, .. }) => format!("  (changed: {})", fields.join(", ")),
            _ => String::new(),
        };
        writeln!(
            out,
            "  {} {name}  {}{suffix}",
            change_marker(change),
            descriptor.kind.type_name()
        )?;
        for line in describe(descriptor) {
            writeln!(out, "      {line}")?;
        }
    }

    if let Some(ref changes) = changes {
        for change in changes {
            if let Change::Delete(name) = change {
                writeln!(out, "  {} {name}", change_marker(Some(change)))?;
            }
        }
        let count = |f: fn(&Change) -> bool| changes.iter().filter(|&c| f(c)).count();
        writeln!(out)?;
        writeln!(
            out,
            "  {} to create, {} to update, {} to delete, {} unchanged.",
            count(|c| matches!(c, Change::Create(_))),
            count(|c| matches!(c, Change::Update { .. })),
            count(|c| matches!(c, Change::Delete(_))),
            count(|c| matches!(c, Change::Same(_))),
        )?;
    } else {
        writeln!(out)?;
        writeln!(out, "  {} resource(s) will be created.", order.len())?;
    }

    if !stack.outputs.is_empty() {
        writeln!(out)?;
        writeln!(out, "  Outputs:")?;
        for (key, value) in &stack.outputs {
            writeln!(out, "    {key}: {}", format_value(value, false))?;
        }
    }

    Ok(())
}
