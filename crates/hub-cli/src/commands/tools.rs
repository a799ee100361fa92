//! `tools` command: connect to every configured server and list tools.

use crate::formatters::format_output;
use anyhow::Result;
use mcp_hub_core::HubConfig;
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use mcp_hub_pool::{SessionPool, discover};

/// Runs tool discovery and prints the aggregated report.
///
/// Exits with `SERVER_ERROR` when servers are configured but none could be
/// reached; the report is printed either way so partial results are never
/// lost.
pub async fn run(
    pool: &SessionPool,
    config: &HubConfig,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let sessions = pool.acquire(config).await;
    let report = discover(&sessions, pool.config().call_timeout()).await;

    println!("{}", format_output(&report, output_format)?);

    if report.server_count == 0 && !report.servers.is_empty() {
        return Ok(ExitCode::SERVER_ERROR);
    }
    Ok(ExitCode::SUCCESS)
}
