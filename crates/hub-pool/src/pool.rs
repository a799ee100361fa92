//! Session pool keyed by configuration fingerprint.
//!
//! The pool guarantees at most one live [`SessionSet`] per fingerprint.
//! Acquiring an already-built fingerprint is a cheap map lookup; acquiring a
//! new one spawns every configured server concurrently. A set whose servers
//! partially failed is repaired on the next acquire by reconnecting only the
//! failed servers, keeping the healthy sessions untouched.

use crate::connector::{Connector, StdioConnector, connect_with_timeout};
use crate::session::{Session, SessionSet, SessionState};
use futures::future::join_all;
use mcp_hub_core::{Error, Fingerprint, HubConfig, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Tunable settings for a [`SessionPool`].
///
/// # Examples
///
/// ```
/// use mcp_hub_pool::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::new()
///     .with_connect_timeout(Duration::from_secs(10))
///     .with_call_timeout(Duration::from_secs(30));
/// assert_eq!(config.connect_timeout(), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    connect_timeout: Duration,
    call_timeout: Duration,
}

impl PoolConfig {
    /// Default deadline for establishing one server connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default deadline for one tool call.
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a config with default timeouts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the per-server connect deadline.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-call deadline.
    #[must_use]
    pub const fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Validates the config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when either timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "connect timeout must be non-zero".to_string(),
            ));
        }
        if self.call_timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "call timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The per-server connect deadline.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// The per-call deadline.
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        self.call_timeout
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One slot in the pool. The inner mutex serializes builds for a single
/// fingerprint without blocking builds for other fingerprints.
#[derive(Debug, Default)]
struct PoolEntry {
    slot: Mutex<Option<Arc<SessionSet>>>,
}

/// Pool of MCP server sessions, one set per configuration fingerprint.
///
/// # Thread Safety
///
/// The pool is `Send` and `Sync`; share it behind an `Arc`. Concurrent
/// acquires of the same fingerprint are serialized so the servers spawn
/// once. Acquires of distinct fingerprints proceed in parallel.
///
/// # Examples
///
/// ```no_run
/// use mcp_hub_core::HubConfig;
/// use mcp_hub_pool::SessionPool;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SessionPool::with_defaults();
/// let config = HubConfig::from_json(r#"{"mcpServers":{"fetch":{"command":"uvx"}}}"#)?;
///
/// let sessions = pool.acquire(&config).await;
/// println!("{}/{} servers connected", sessions.connected_count(), sessions.len());
/// # Ok(())
/// # }
/// ```
pub struct SessionPool {
    connector: Arc<dyn Connector>,
    config: PoolConfig,
    entries: Mutex<HashMap<Fingerprint, Arc<PoolEntry>>>,

    // Statistics counters (thread-safe atomics)
    total_builds: AtomicU32,
    cache_hits: AtomicU32,
    repairs: AtomicU32,
    invalidations: AtomicU32,
    connection_failures: AtomicU32,
}

impl std::fmt::Debug for SessionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPool")
            .field("connector", &"dyn Connector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionPool {
    /// Creates a pool that spawns servers over stdio.
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self::with_connector(config, Arc::new(StdioConnector::new()))
    }

    /// Creates a pool with default settings and the stdio connector.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PoolConfig::new())
    }

    /// Creates a pool backed by a custom connector.
    #[must_use]
    pub fn with_connector(config: PoolConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            config,
            entries: Mutex::new(HashMap::new()),
            total_builds: AtomicU32::new(0),
            cache_hits: AtomicU32::new(0),
            repairs: AtomicU32::new(0),
            invalidations: AtomicU32::new(0),
            connection_failures: AtomicU32::new(0),
        }
    }

    /// The pool's settings.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the live session set for `config`, building it if needed.
    ///
    /// Never fails wholesale: a server that cannot be spawned is recorded
    /// as [`SessionState::Failed`] inside the returned set while the other
    /// servers connect normally. If a cached set has failed servers, only
    /// those servers are reconnected; healthy sessions carry over.
    ///
    /// The returned `Arc` is a snapshot. It stays valid even if the
    /// fingerprint is invalidated while the caller still holds it.
    pub async fn acquire(&self, config: &HubConfig) -> Arc<SessionSet> {
        let fingerprint = config.fingerprint();

        let entry = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(fingerprint.clone()).or_default())
        };

        // Per-fingerprint lock: a second acquire of the same config waits
        // here and then sees the set the first one built.
        let mut slot = entry.slot.lock().await;

        if let Some(existing) = slot.as_ref() {
            if existing.all_connected() {
                tracing::debug!(fingerprint = %fingerprint, "session cache hit");
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(existing);
            }
            tracing::info!(
                fingerprint = %fingerprint,
                failed = existing.len() - existing.connected_count(),
                "repairing session set"
            );
            self.repairs.fetch_add(1, Ordering::Relaxed);
        } else {
            tracing::info!(
                fingerprint = %fingerprint,
                servers = config.len(),
                "building session set"
            );
        }

        let previous = slot.take();
        let set = Arc::new(self.build_set(config, fingerprint, previous.as_deref()).await);
        *slot = Some(Arc::clone(&set));
        set
    }

    /// Builds a session set, carrying over connected sessions from
    /// `previous` and connecting the rest concurrently.
    async fn build_set(
        &self,
        config: &HubConfig,
        fingerprint: Fingerprint,
        previous: Option<&SessionSet>,
    ) -> SessionSet {
        self.total_builds.fetch_add(1, Ordering::Relaxed);

        let mut sessions = BTreeMap::new();
        let mut pending = Vec::new();

        for (name, spec) in config.servers() {
            let kept = previous
                .and_then(|prev| prev.get(name))
                .filter(|state| state.is_connected())
                .cloned();
            match kept {
                Some(state) => {
                    sessions.insert(name.clone(), state);
                }
                None => pending.push((name.clone(), spec.clone())),
            }
        }

        let connects = pending.into_iter().map(|(name, spec)| async move {
            let state = match connect_with_timeout(
                self.connector.as_ref(),
                &spec,
                self.config.connect_timeout(),
            )
            .await
            {
                Ok(channel) => SessionState::Connected(Arc::new(Session::new(
                    name.clone(),
                    spec.command().to_string(),
                    channel,
                ))),
                Err(e) => {
                    tracing::warn!(server = %name, error = %e, "server connection failed");
                    self.connection_failures.fetch_add(1, Ordering::Relaxed);
                    SessionState::Failed(e.to_string())
                }
            };
            (name, state)
        });

        for (name, state) in join_all(connects).await {
            sessions.insert(name, state);
        }

        SessionSet::new(fingerprint, sessions)
    }

    /// Drops the session set for `config`, closing its server processes
    /// once no caller holds a snapshot.
    ///
    /// Returns `true` when a set existed for the fingerprint.
    pub async fn invalidate(&self, config: &HubConfig) -> bool {
        let fingerprint = config.fingerprint();
        let removed = self.entries.lock().await.remove(&fingerprint).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            tracing::info!(fingerprint = %fingerprint, "session set invalidated");
        }
        removed
    }

    /// Drops every session set in the pool.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.lock().await;
        let count = entries.len();
        entries.clear();
        if count > 0 {
            self.invalidations
                .fetch_add(count.try_into().unwrap_or(u32::MAX), Ordering::Relaxed);
            tracing::info!(count, "all session sets invalidated");
        }
    }

    /// Number of fingerprints with a pool slot.
    pub async fn live_sets(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Collects a snapshot of pool statistics.
    pub async fn collect_stats(&self) -> PoolStats {
        let live_sets = self.entries.lock().await.len();
        PoolStats {
            total_builds: self.total_builds.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            repairs: self.repairs.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            connection_failures: self.connection_failures.load(Ordering::Relaxed),
            live_sets,
        }
    }
}

/// Snapshot of pool counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PoolStats {
    /// Session set builds, including repairs.
    pub total_builds: u32,
    /// Acquires served from an already-connected set.
    pub cache_hits: u32,
    /// Builds that reconnected only failed servers.
    pub repairs: u32,
    /// Explicit invalidations.
    pub invalidations: u32,
    /// Individual server connection failures.
    pub connection_failures: u32,
    /// Fingerprints currently held by the pool.
    pub live_sets: usize,
}

impl PoolStats {
    /// Fraction of acquires served without building, or `None` before any
    /// acquire.
    #[must_use]
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.total_builds + self.cache_hits;
        if total == 0 {
            None
        } else {
            Some(f64::from(self.cache_hits) / f64::from(total))
        }
    }
}
