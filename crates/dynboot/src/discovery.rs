//! Bootstrap node discovery.
//!
//! [`Discovery`] ties a [`NodeSource`] to a [`Scheduler`]. Every call fetches
//! the registry afresh; nothing is cached between calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tox_dynboot::{Discovery, DiscoveryConfig};
//!
//! let discovery = Discovery::from_config(&DiscoveryConfig::default())?;
//!
//! // Fastest: the first node to answer, if it answered alive
//! if let Some(node) = discovery.fetch_first_reachable(Duration::from_secs(2)).await? {
//!     println!("bootstrapping from {node}");
//! }
//! ```

use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::node::{ToxNode, advertised_up};
use crate::probe::TcpProbe;
use crate::registry::{NodeSource, WikiRegistry};
use crate::scheduler::Scheduler;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches node candidates and selects live ones.
pub struct Discovery {
    source: Arc<dyn NodeSource>,
    scheduler: Scheduler,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl Discovery {
    #[must_use]
    pub fn new(source: Arc<dyn NodeSource>, scheduler: Scheduler) -> Self {
        Self { source, scheduler }
    }

    /// Build a discovery against the HTTP registry with TCP probing.
    pub fn from_config(config: &DiscoveryConfig) -> Result<Self> {
        let registry =
            WikiRegistry::new(&config.registry_url, config.layout, config.http_timeout)?;
        let probe = Arc::new(TcpProbe);
        let scheduler = match config.rng_seed {
            Some(seed) => Scheduler::with_seed(probe, seed),
            None => Scheduler::new(probe),
        };
        Ok(Self::new(Arc::new(registry), scheduler))
    }

    /// Every candidate in the registry, regardless of advertised status.
    pub async fn fetch_all_candidates(&self) -> Result<Vec<ToxNode>> {
        self.source.fetch_all().await
    }

    /// Candidates the registry advertises as up.
    pub async fn fetch_up(&self) -> Result<Vec<ToxNode>> {
        Ok(advertised_up(self.fetch_all_candidates().await?))
    }

    /// A random advertised-up candidate, without probing.
    pub async fn fetch_any(&self) -> Result<Option<ToxNode>> {
        let nodes = self.fetch_up().await?;
        Ok(self.scheduler.choose(&nodes).await)
    }

    /// All advertised-up candidates that answer a probe within `timeout`.
    ///
    /// Blocks for up to `timeout` regardless of how many nodes there are.
    pub async fn fetch_reachable(&self, timeout: Duration) -> Result<Vec<ToxNode>> {
        let nodes = self.probe_candidates().await?;
        Ok(self.scheduler.all(nodes, timeout).await)
    }

    /// A random node among those that answer a probe within `timeout`.
    ///
    /// Prefer [`fetch_first_reachable`](Self::fetch_first_reachable) when
    /// latency matters more than spreading load.
    pub async fn fetch_any_reachable(&self, timeout: Duration) -> Result<Option<ToxNode>> {
        let nodes = self.probe_candidates().await?;
        Ok(self.scheduler.any_one(nodes, timeout).await)
    }

    /// The node whose probe finishes first, if that probe found it alive.
    ///
    /// Fails with [`Error::NoCandidates`](crate::Error::NoCandidates) when the
    /// registry advertises no probeable node.
    pub async fn fetch_first_reachable(&self, timeout: Duration) -> Result<Option<ToxNode>> {
        let nodes = self.probe_candidates().await?;
        self.scheduler.first_one(nodes, timeout).await
    }

    async fn probe_candidates(&self) -> Result<Vec<ToxNode>> {
        let up = self.fetch_up().await?;
        let total = up.len();
        let nodes: Vec<ToxNode> = up.into_iter().filter(ToxNode::is_probeable).collect();
        if nodes.len() < total {
            debug!("Skipping {} nodes without an IPv4 address", total - nodes.len());
        }
        info!("Probing {} advertised-up nodes", nodes.len());
        Ok(nodes)
    }
}
