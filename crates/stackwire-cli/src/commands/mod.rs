//! CLI command definitions and dispatch.

pub mod config;
pub mod outputs;
pub mod plan;
pub mod render;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stackwire_common::config::{ProjectSettings, StackConfig};
use stackwire_common::constants::{CWD_ENV, DEFAULT_STACK, STACK_ENV};
use stackwire_common::types::StackName;
use stackwire_compose::stack::Stack;
use stackwire_services::{ServicesConfig, declare};

/// Stackwire — declarative database, backend and frontend containers.
#[derive(Parser, Debug)]
#[command(name = "stackwire", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Stack to operate on.
    #[arg(short, long, global = true, env = STACK_ENV, default_value = DEFAULT_STACK)]
    pub stack: String,

    /// Project directory containing `Stackwire.yaml`.
    #[arg(long, global = true, env = CWD_ENV, default_value = ".")]
    pub cwd: PathBuf,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the resources that would be handed to the engine.
    Plan(plan::PlanArgs),
    /// Write the JSON hand-off document.
    Render(render::RenderArgs),
    /// Print the exported outputs.
    Outputs(outputs::OutputsArgs),
    /// List the stack configuration.
    Config(config::ConfigArgs),
}

/// Selected project and stack.
#[derive(Debug, Clone)]
pub struct Context {
    /// Project directory.
    pub cwd: PathBuf,
    /// Active stack.
    pub stack: StackName,
}

impl Context {
    /// Loads project settings and the stack configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed.
    pub fn load_config(&self) -> anyhow::Result<(ProjectSettings, StackConfig)> {
        Ok(StackConfig::load(&self.cwd, &self.stack)?)
    }

    /// Loads configuration and declares the services stack.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid, or the
    /// declared stack fails validation.
    pub fn declare(&self) -> anyhow::Result<(ProjectSettings, Stack)> {
        let (project, config) = self.load_config()?;
        let services = ServicesConfig::from_config(&config)?;
        let stack = declare(&services, &self.stack)?;
        tracing::info!(
            project = %project.name,
            stack = %self.stack,
            resources = stack.resources.len(),
            "stack declared"
        );
        Ok((project, stack))
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context {
        cwd: cli.cwd,
        stack: StackName::new(cli.stack)?,
    };
    match cli.command {
        Command::Plan(args) => plan::execute(&ctx, args),
        Command::Render(args) => render::execute(&ctx, args),
        Command::Outputs(args) => outputs::execute(&ctx, args),
        Command::Config(args) => config::execute(&ctx, args),
    }
}
