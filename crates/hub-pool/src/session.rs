//! Live sessions and the per-fingerprint session set.

use crate::connector::ToolChannel;
use chrono::{DateTime, Utc};
use mcp_hub_core::{Fingerprint, Result, ServerId, SessionId, Tool};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// One live connection to an MCP server.
///
/// Dropping the last `Arc<Session>` closes the channel, which for stdio
/// transport terminates the server process.
pub struct Session {
    id: SessionId,
    server: ServerId,
    command: String,
    connected_at: DateTime<Utc>,
    channel: Box<dyn ToolChannel>,
    catalog: OnceCell<Vec<Tool>>,
}

impl Session {
    pub(crate) fn new(server: ServerId, command: String, channel: Box<dyn ToolChannel>) -> Self {
        Self {
            id: SessionId::generate(),
            server,
            command,
            connected_at: Utc::now(),
            channel,
            catalog: OnceCell::new(),
        }
    }

    /// Returns the server's tool catalog.
    ///
    /// Fetched from the server on first use and cached for the lifetime of
    /// the session; a reconnect produces a new session and a fresh fetch.
    /// A failed fetch is not cached, so the next call retries.
    ///
    /// # Errors
    ///
    /// Returns the listing error when the server refuses or cannot answer.
    pub async fn tools(&self) -> Result<&[Tool]> {
        let tools = self
            .catalog
            .get_or_try_init(|| self.channel.list_tools())
            .await?;
        Ok(tools.as_slice())
    }

    /// Unique identifier for this session.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The server this session is connected to.
    #[must_use]
    pub const fn server(&self) -> &ServerId {
        &self.server
    }

    /// The resolved command the server was started with.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// When the connection was established.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// The channel used to talk to the server.
    #[must_use]
    pub fn channel(&self) -> &dyn ToolChannel {
        self.channel.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("server", &self.server)
            .field("command", &self.command)
            .field("connected_at", &self.connected_at)
            .field("channel", &"dyn ToolChannel")
            .field("catalog", &self.catalog.get().map(Vec::len))
            .finish()
    }
}

/// Connection outcome for one server within a session set.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// The server connected; the session is usable.
    Connected(Arc<Session>),
    /// The connection attempt failed with this message.
    Failed(String),
}

impl SessionState {
    /// Returns the session for a connected server.
    #[must_use]
    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            Self::Connected(session) => Some(session),
            Self::Failed(_) => None,
        }
    }

    /// Returns `true` when the server connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Returns the failure message for a failed server.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Connected(_) => None,
            Self::Failed(message) => Some(message),
        }
    }
}

/// The sessions built for one configuration fingerprint.
///
/// Holds one [`SessionState`] per configured server, connected or not, so a
/// partially reachable configuration still exposes its working servers.
/// Session sets are immutable snapshots; the pool replaces the whole set
/// when it repairs failed servers.
#[derive(Debug, Clone)]
pub struct SessionSet {
    fingerprint: Fingerprint,
    sessions: BTreeMap<ServerId, SessionState>,
}

impl SessionSet {
    pub(crate) const fn new(
        fingerprint: Fingerprint,
        sessions: BTreeMap<ServerId, SessionState>,
    ) -> Self {
        Self {
            fingerprint,
            sessions,
        }
    }

    /// The fingerprint this set was built for.
    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Looks up the state for one server.
    #[must_use]
    pub fn get(&self, server: &ServerId) -> Option<&SessionState> {
        self.sessions.get(server)
    }

    /// Iterates over all server states in sorted name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ServerId, &SessionState)> {
        self.sessions.iter()
    }

    /// Number of servers in the set, connected or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` for an empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Number of servers that connected.
    #[must_use]
    pub fn connected_count(&self) -> usize {
        self.sessions
            .values()
            .filter(|state| state.is_connected())
            .count()
    }

    /// Returns `true` when every server in the set connected.
    #[must_use]
    pub fn all_connected(&self) -> bool {
        self.sessions.values().all(SessionState::is_connected)
    }
}
