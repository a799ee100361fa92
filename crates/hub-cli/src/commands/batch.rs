//! `batch` command: fan a JSON array of tool calls out in parallel.

use crate::formatters::format_output;
use anyhow::{Context, Result};
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use mcp_hub_core::{HubConfig, ToolCallRequest};
use mcp_hub_pool::{SessionPool, invoke_all};
use std::io::Read;
use std::path::Path;

/// Runs every request in the batch concurrently and prints the results in
/// request order.
///
/// The input is a JSON array of `{"server", "tool", "arguments"}` objects,
/// read from `input` or from stdin when no path is given. A malformed
/// batch exits with `INVALID_INPUT`; individual call failures appear in
/// the output and turn the exit code into `ERROR`.
pub async fn run(
    pool: &SessionPool,
    config: &HubConfig,
    input: Option<&Path>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let text = match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read batch file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read batch from stdin")?;
            buffer
        }
    };

    let requests: Vec<ToolCallRequest> = match serde_json::from_str(&text) {
        Ok(requests) => requests,
        Err(e) => {
            eprintln!("Error: batch input must be a JSON array of tool calls: {e}");
            return Ok(ExitCode::INVALID_INPUT);
        }
    };

    let sessions = pool.acquire(config).await;
    let results = invoke_all(&sessions, requests, pool.config().call_timeout()).await;

    println!("{}", format_output(&results, output_format)?);

    if results.iter().all(|r| r.outcome.is_success()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::ERROR)
    }
}
