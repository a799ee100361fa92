//! MCP Hub CLI.
//!
//! Command-line interface for connecting to MCP servers defined in an
//! `mcpServers` configuration, listing their tools, and invoking tools
//! one at a time or as a parallel batch.
//!
//! # Examples
//!
//! ```bash
//! # List every tool across all configured servers
//! mcp-hub tools
//!
//! # Invoke a single tool
//! mcp-hub call fetch fetch --args '{"url": "https://example.com"}'
//!
//! # Run a batch of calls from a file
//! mcp-hub batch calls.json --format json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use mcp_hub_cli::commands;
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// MCP Hub - pooled access to MCP servers over stdio.
#[derive(Parser, Debug)]
#[command(name = "mcp-hub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,

    /// Path to the mcpServers config file (default: ~/.mcp-hub/mcp.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep commands exactly as written instead of resolving launcher
    /// aliases like uvx or npx
    #[arg(long, global = true)]
    no_resolve: bool,

    /// Per-server connection timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    connect_timeout: u64,

    /// Per-call timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    call_timeout: u64,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tools of every configured server.
    ///
    /// Connects to all servers concurrently and prints an aggregated
    /// report. Servers that cannot be reached appear with an error entry
    /// instead of hiding the rest.
    Tools,

    /// Invoke one tool on one server.
    Call {
        /// Server name from the configuration
        server: String,

        /// Tool to invoke
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },

    /// Invoke a batch of tool calls in parallel.
    ///
    /// Reads a JSON array of `{"server", "tool", "arguments"}` objects
    /// and prints the results in the same order.
    Batch {
        /// Batch file to read (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Show how launcher commands resolve on this machine.
    Resolve {
        /// Commands to resolve (e.g. uvx npx python)
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli, output_format).await?;
    std::process::exit(exit_code.as_i32());
}

/// Sets up tracing on stderr so command output on stdout stays clean.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes the parsed command to its handler.
async fn execute_command(cli: Cli, output_format: OutputFormat) -> Result<ExitCode> {
    match cli.command {
        Commands::Tools => {
            let config = commands::common::load_config(cli.config.as_deref(), cli.no_resolve).await?;
            let pool = commands::common::build_pool(cli.connect_timeout, cli.call_timeout)?;
            commands::tools::run(&pool, &config, output_format).await
        }
        Commands::Call { server, tool, args } => {
            let config = commands::common::load_config(cli.config.as_deref(), cli.no_resolve).await?;
            let pool = commands::common::build_pool(cli.connect_timeout, cli.call_timeout)?;
            commands::call::run(
                &pool,
                &config,
                &server,
                &tool,
                args.as_deref(),
                output_format,
            )
            .await
        }
        Commands::Batch { input } => {
            let config = commands::common::load_config(cli.config.as_deref(), cli.no_resolve).await?;
            let pool = commands::common::build_pool(cli.connect_timeout, cli.call_timeout)?;
            commands::batch::run(&pool, &config, input.as_deref(), output_format).await
        }
        Commands::Resolve { commands: names } => commands::resolve::run(&names, output_format),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_tools() {
        let cli = Cli::parse_from(["mcp-hub", "tools"]);
        assert!(matches!(cli.command, Commands::Tools));
        assert_eq!(cli.connect_timeout, 30);
        assert_eq!(cli.call_timeout, 60);
    }

    #[test]
    fn test_cli_parsing_call_with_args() {
        let cli = Cli::parse_from([
            "mcp-hub",
            "call",
            "fetch",
            "fetch_url",
            "--args",
            r#"{"url": "https://example.com"}"#,
        ]);
        if let Commands::Call { server, tool, args } = cli.command {
            assert_eq!(server, "fetch");
            assert_eq!(tool, "fetch_url");
            assert_eq!(args, Some(r#"{"url": "https://example.com"}"#.to_string()));
        } else {
            panic!("Expected Call command");
        }
    }

    #[test]
    fn test_cli_parsing_batch_stdin() {
        let cli = Cli::parse_from(["mcp-hub", "batch"]);
        if let Commands::Batch { input } = cli.command {
            assert!(input.is_none());
        } else {
            panic!("Expected Batch command");
        }
    }

    #[test]
    fn test_cli_parsing_resolve_requires_commands() {
        assert!(Cli::try_parse_from(["mcp-hub", "resolve"]).is_err());

        let cli = Cli::parse_from(["mcp-hub", "resolve", "uvx", "npx"]);
        if let Commands::Resolve { commands } = cli.command {
            assert_eq!(commands, vec!["uvx", "npx"]);
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "mcp-hub",
            "--verbose",
            "--format",
            "json",
            "--config",
            "/tmp/mcp.json",
            "--connect-timeout",
            "5",
            "tools",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mcp.json")));
        assert_eq!(cli.connect_timeout, 5);
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::parse_from(["mcp-hub", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }
}
