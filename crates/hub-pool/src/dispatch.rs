//! Parallel tool invocation against a session set.

use crate::session::{SessionSet, SessionState};
use futures::future::join_all;
use mcp_hub_core::{Error, ToolCallRequest, ToolCallResult, ToolOutcome};
use std::time::Duration;

/// Invokes one tool, mapping every failure mode into the result payload.
///
/// Unknown servers, servers that failed to connect, tool-level errors, and
/// timeouts all come back as [`ToolOutcome::Failure`]; this function itself
/// never fails.
pub async fn invoke_one(
    sessions: &SessionSet,
    request: ToolCallRequest,
    call_timeout: Duration,
) -> ToolCallResult {
    let ToolCallRequest {
        server,
        tool,
        arguments,
    } = request;

    let session = match sessions.get(&server) {
        None => {
            return ToolCallResult::failure(
                server.clone(),
                tool,
                format!("server '{server}' is not configured"),
            );
        }
        Some(SessionState::Failed(message)) => {
            return ToolCallResult::failure(
                server.clone(),
                tool,
                format!("server '{server}' is not connected: {message}"),
            );
        }
        Some(SessionState::Connected(session)) => session,
    };

    tracing::debug!(server = %server, tool = %tool, "invoking tool");
    let outcome = match tokio::time::timeout(
        call_timeout,
        session.channel().call_tool(tool.as_str(), arguments),
    )
    .await
    {
        Ok(Ok(result)) => ToolOutcome::Success { result },
        Ok(Err(e)) => {
            tracing::warn!(server = %server, tool = %tool, error = %e, "tool call failed");
            ToolOutcome::Failure {
                error: e.to_string(),
            }
        }
        Err(_) => {
            let e = Error::Timeout {
                operation: format!("call '{tool}' on '{server}'"),
                duration_secs: call_timeout.as_secs(),
            };
            tracing::warn!(server = %server, tool = %tool, "tool call timed out");
            ToolOutcome::Failure {
                error: e.to_string(),
            }
        }
    };

    ToolCallResult {
        server,
        tool,
        outcome,
    }
}

/// Invokes every request concurrently.
///
/// Results come back in the order of their requests regardless of which
/// call finishes first, and one failed call never disturbs the others.
pub async fn invoke_all(
    sessions: &SessionSet,
    requests: Vec<ToolCallRequest>,
    call_timeout: Duration,
) -> Vec<ToolCallResult> {
    join_all(
        requests
            .into_iter()
            .map(|request| invoke_one(sessions, request, call_timeout)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ToolChannel;
    use crate::session::Session;
    use async_trait::async_trait;
    use mcp_hub_core::{HubConfig, Result, ServerId};
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    struct EchoChannel;

    #[async_trait]
    impl ToolChannel for EchoChannel {
        async fn list_tools(&self) -> Result<Vec<mcp_hub_core::Tool>> {
            Ok(vec![])
        }

        async fn call_tool(&self, tool: &str, arguments: Option<Value>) -> Result<Value> {
            Ok(json!({"tool": tool, "arguments": arguments}))
        }
    }

    struct SlowChannel;

    #[async_trait]
    impl ToolChannel for SlowChannel {
        async fn list_tools(&self) -> Result<Vec<mcp_hub_core::Tool>> {
            Ok(vec![])
        }

        async fn call_tool(&self, _tool: &str, _arguments: Option<Value>) -> Result<Value> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Value::Null)
        }
    }

    fn set_with(channels: Vec<(&str, Box<dyn ToolChannel>)>) -> SessionSet {
        let mut sessions = BTreeMap::new();
        for (name, channel) in channels {
            let id = ServerId::from(name);
            let session = Session::new(id.clone(), "cmd".to_string(), channel);
            sessions.insert(id, SessionState::Connected(Arc::new(session)));
        }
        SessionSet::new(HubConfig::from_specs(vec![]).fingerprint(), sessions)
    }

    const TIMEOUT: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_invoke_one_success() {
        let set = set_with(vec![("echo", Box::new(EchoChannel))]);
        let result = invoke_one(
            &set,
            ToolCallRequest::new("echo", "say", Some(json!({"text": "hi"}))),
            TIMEOUT,
        )
        .await;

        assert!(result.outcome.is_success());
        match result.outcome {
            ToolOutcome::Success { result } => {
                assert_eq!(result["tool"], json!("say"));
                assert_eq!(result["arguments"]["text"], json!("hi"));
            }
            ToolOutcome::Failure { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_invoke_one_unknown_server() {
        let set = set_with(vec![("echo", Box::new(EchoChannel))]);
        let result = invoke_one(&set, ToolCallRequest::new("ghost", "say", None), TIMEOUT).await;

        assert!(!result.outcome.is_success());
        match result.outcome {
            ToolOutcome::Failure { error } => assert!(error.contains("not configured")),
            ToolOutcome::Success { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_invoke_one_failed_server() {
        let mut sessions = BTreeMap::new();
        sessions.insert(
            "down".into(),
            SessionState::Failed("spawn failed".to_string()),
        );
        let set = SessionSet::new(HubConfig::from_specs(vec![]).fingerprint(), sessions);

        let result = invoke_one(&set, ToolCallRequest::new("down", "say", None), TIMEOUT).await;
        match result.outcome {
            ToolOutcome::Failure { error } => {
                assert!(error.contains("not connected"));
                assert!(error.contains("spawn failed"));
            }
            ToolOutcome::Success { .. } => unreachable!(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_one_timeout() {
        let set = set_with(vec![("slow", Box::new(SlowChannel))]);
        let result = invoke_one(
            &set,
            ToolCallRequest::new("slow", "wait", None),
            Duration::from_secs(5),
        )
        .await;

        match result.outcome {
            ToolOutcome::Failure { error } => assert!(error.contains("timed out")),
            ToolOutcome::Success { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_invoke_all_preserves_request_order() {
        let set = set_with(vec![("echo", Box::new(EchoChannel))]);
        let requests = vec![
            ToolCallRequest::new("echo", "first", None),
            ToolCallRequest::new("ghost", "second", None),
            ToolCallRequest::new("echo", "third", None),
        ];

        let results = invoke_all(&set, requests, TIMEOUT).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].tool.as_str(), "first");
        assert_eq!(results[1].tool.as_str(), "second");
        assert_eq!(results[2].tool.as_str(), "third");
        assert!(results[0].outcome.is_success());
        assert!(!results[1].outcome.is_success());
        assert!(results[2].outcome.is_success());
    }

    #[tokio::test]
    async fn test_invoke_all_empty() {
        let set = set_with(vec![]);
        let results = invoke_all(&set, vec![], TIMEOUT).await;
        assert!(results.is_empty());
    }
}
