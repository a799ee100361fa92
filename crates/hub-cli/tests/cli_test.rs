//! Integration tests for the CLI command layer, run against configs with
//! no reachable servers so nothing is actually spawned.

use mcp_hub_cli::commands;
use mcp_hub_core::HubConfig;
use mcp_hub_core::cli::{ExitCode, OutputFormat};
use std::io::Write;
use tempfile::NamedTempFile;

fn empty_config() -> HubConfig {
    HubConfig::from_json_with(
        r#"{"mcpServers":{}}"#,
        &mcp_hub_core::CommandResolver::with_search_path(""),
        false,
    )
    .unwrap()
}

#[tokio::test]
async fn tools_succeeds_on_empty_config() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let code = commands::tools::run(&pool, &config, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[tokio::test]
async fn tools_reports_server_error_when_nothing_connects() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    // One server whose binary does not exist.
    let config = HubConfig::from_json_with(
        r#"{"mcpServers":{"ghost":{"command":"/nonexistent/mcp-server"}}}"#,
        &mcp_hub_core::CommandResolver::with_search_path(""),
        false,
    )
    .unwrap();

    let code = commands::tools::run(&pool, &config, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SERVER_ERROR);
}

#[tokio::test]
async fn call_rejects_non_object_arguments() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let code = commands::call::run(
        &pool,
        &config,
        "any",
        "tool",
        Some(r#"["not", "an", "object"]"#),
        OutputFormat::Text,
    )
    .await
    .unwrap();
    assert_eq!(code, ExitCode::INVALID_INPUT);
}

#[tokio::test]
async fn call_unknown_server_is_a_server_error() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let code = commands::call::run(&pool, &config, "ghost", "tool", None, OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SERVER_ERROR);
}

#[tokio::test]
async fn batch_rejects_malformed_input() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"not": "an array"}}"#).unwrap();

    let code = commands::batch::run(&pool, &config, Some(file.path()), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::INVALID_INPUT);
}

#[tokio::test]
async fn batch_of_zero_requests_succeeds() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[]").unwrap();

    let code = commands::batch::run(&pool, &config, Some(file.path()), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
}

#[tokio::test]
async fn batch_with_unknown_server_exits_nonzero() {
    let pool = commands::common::build_pool(30, 60).unwrap();
    let config = empty_config();

    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"[{{"server": "ghost", "tool": "anything"}}]"#).unwrap();

    let code = commands::batch::run(&pool, &config, Some(file.path()), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(code, ExitCode::ERROR);
}
