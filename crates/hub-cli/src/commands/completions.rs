//! Shell completion generation command.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use mcp_hub_core::cli::ExitCode;
use std::io;

/// Prints the completion script for `shell` to stdout.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    tracing::info!("generating {shell} completions");
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;

    #[test]
    fn test_generate_for_common_shells() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut cmd = Command::new("test-cli");
            assert_eq!(run(shell, &mut cmd).unwrap(), ExitCode::SUCCESS);
        }
    }
}
