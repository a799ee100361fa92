//! Tool discovery across every server in a session set.

use crate::session::{SessionSet, SessionState};
use futures::future::join_all;
use mcp_hub_core::{DiscoveryReport, Error, ServerTools};
use std::time::Duration;

/// Lists the tools of every server in `sessions` concurrently.
///
/// Each catalog fetch is bounded by `list_timeout`, so one hung server
/// cannot stall the whole discovery. Servers that failed to connect, or
/// whose listing fails or times out, appear in the report as an error
/// entry; the report itself always succeeds. The report's `server_count`
/// counts connected servers, whether or not their listing succeeded.
pub async fn discover(sessions: &SessionSet, list_timeout: Duration) -> DiscoveryReport {
    let listings = sessions.iter().map(|(name, state)| async move {
        let (connected, outcome) = match state {
            SessionState::Connected(session) => {
                let outcome = match tokio::time::timeout(list_timeout, session.tools()).await {
                    Ok(Ok(tools)) => {
                        tracing::debug!(server = %name, count = tools.len(), "listed tools");
                        ServerTools::Tools(tools.to_vec())
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(server = %name, error = %e, "tool listing failed");
                        ServerTools::Error {
                            error: e.to_string(),
                        }
                    }
                    Err(_) => {
                        let e = Error::Timeout {
                            operation: format!("list tools on '{name}'"),
                            duration_secs: list_timeout.as_secs(),
                        };
                        tracing::warn!(server = %name, "tool listing timed out");
                        ServerTools::Error {
                            error: e.to_string(),
                        }
                    }
                };
                (true, outcome)
            }
            SessionState::Failed(message) => (
                false,
                ServerTools::Error {
                    error: message.clone(),
                },
            ),
        };
        (name.to_string(), connected, outcome)
    });

    let mut report =
        DiscoveryReport::new(sessions.iter().map(|(name, _)| name.to_string()).collect());
    for (server, connected, outcome) in join_all(listings).await {
        report.record(server, connected, outcome);
    }
    report
}
