//! `call` command: invoke a single tool on one server.

use crate::formatters::format_output;
use anyhow::Result;
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use mcp_hub_core::{HubConfig, ToolCallRequest, ToolOutcome};
use mcp_hub_pool::{SessionPool, invoke_one};

/// Invokes `tool` on `server` with optional JSON arguments.
///
/// `arguments` must parse to a JSON object when given. Call failures are
/// printed as part of the result payload; the exit code distinguishes
/// timeouts from other server errors.
pub async fn run(
    pool: &SessionPool,
    config: &HubConfig,
    server: &str,
    tool: &str,
    arguments: Option<&str>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let arguments = match arguments {
        None => None,
        Some(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) if value.is_object() => Some(value),
            Ok(_) => {
                eprintln!("Error: --args must be a JSON object");
                return Ok(ExitCode::INVALID_INPUT);
            }
            Err(e) => {
                eprintln!("Error: --args is not valid JSON: {e}");
                return Ok(ExitCode::INVALID_INPUT);
            }
        },
    };

    let sessions = pool.acquire(config).await;
    let request = ToolCallRequest::new(server, tool, arguments);
    let result = invoke_one(&sessions, request, pool.config().call_timeout()).await;

    println!("{}", format_output(&result, output_format)?);

    match &result.outcome {
        ToolOutcome::Success { .. } => Ok(ExitCode::SUCCESS),
        ToolOutcome::Failure { error } if error.contains("timed out") => Ok(ExitCode::TIMEOUT),
        ToolOutcome::Failure { .. } => Ok(ExitCode::SERVER_ERROR),
    }
}
