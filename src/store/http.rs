//! HTTP-backed allow-list store.
//!
//! Talks to a Firebase-RTDB-style JSON endpoint: the full allow-list lives
//! under a single node and is fetched with one GET of `{base}/{node}.json`.
//! The same node is overwritten wholesale by [`HttpStore::publish`], which
//! backs the `push` subcommand.

use std::time::Duration;

use serde_json::Value;

use super::{AllowListStore, Snapshot, StoreError};

/// User-Agent header sent with every store request.
const USER_AGENT: &str = concat!("scangate/", env!("CARGO_PKG_VERSION"));

/// Default request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Allow-list store reached over HTTP.
#[derive(Clone)]
pub struct HttpStore {
    base_url: String,
    node: String,
    agent: ureq::Agent,
}

impl HttpStore {
    /// Create a store client for `node` under `base_url`.
    ///
    /// A trailing slash on `base_url` is tolerated. The timeout applies to
    /// the whole request, connect included.
    #[must_use]
    pub fn new(base_url: &str, node: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            node: node.trim_matches('/').to_string(),
            agent,
        }
    }

    /// Create a store client with the default timeout.
    #[must_use]
    pub fn with_default_timeout(base_url: &str, node: &str) -> Self {
        Self::new(base_url, node, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// The URL the snapshot is fetched from (and published to).
    #[must_use]
    pub fn node_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.node)
    }

    /// Overwrite the allow-list node with the given codes.
    ///
    /// This is the seeding path used by the `push` subcommand; the scan
    /// session itself never writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] when the store rejects the write
    /// or cannot be reached.
    pub fn publish(&self, codes: &[String]) -> Result<(), StoreError> {
        let url = self.node_url();
        log::info!("publishing {} codes to {}", codes.len(), url);

        self.agent
            .put(&url)
            .send_json(codes)
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(())
    }
}

impl AllowListStore for HttpStore {
    fn fetch(&self) -> Result<Snapshot, StoreError> {
        let url = self.node_url();
        log::debug!("fetching allow-list snapshot from {}", url);

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let value: Value = response
            .into_json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(Snapshot::from_value(value))
    }
}
