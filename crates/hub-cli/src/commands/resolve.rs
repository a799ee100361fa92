//! `resolve` command: show how launcher commands map to executables.

use crate::formatters::format_output;
use anyhow::Result;
use mcp_hub_core::CommandResolver;
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;

/// Resolution outcome for one command.
#[derive(Debug, Serialize)]
struct Resolution {
    command: String,
    resolved: String,
    found: bool,
}

/// Resolves each command and prints where it would run from.
///
/// A command that cannot be found is reported with its original string and
/// `found: false`; it does not fail the command, matching how connection
/// time resolution falls back to the literal string.
pub fn run(commands: &[String], output_format: OutputFormat) -> Result<ExitCode> {
    let resolver = CommandResolver::new();

    let resolutions: Vec<Resolution> = commands
        .iter()
        .map(|command| {
            let resolved = resolver.resolve(command);
            let found = resolved != *command || resolver.find_command(command).is_some();
            Resolution {
                command: command.clone(),
                resolved,
                found,
            }
        })
        .collect();

    println!("{}", format_output(&resolutions, output_format)?);
    Ok(ExitCode::SUCCESS)
}
