//! Concurrent probing and selection.
//!
//! # Architecture
//!
//! ```text
//!   nodes ──┬──► spawn(probe(node₀)) ──┐
//!           ├──► spawn(probe(node₁)) ──┤  unbounded mpsc
//!           └──► spawn(probe(nodeₙ)) ──┴──────────────► aggregation ──► Selection
//! ```
//!
//! Every probe task owns its own clone of its node. Results are consumed in
//! arrival order. The channel is unbounded so a probe never blocks on send,
//! and a send after the consumer has returned is simply discarded; the task
//! still runs to completion and closes its own socket.
//!
//! # Policies
//!
//! - [`Policy::All`] waits for every probe and returns the reachable subset.
//! - [`Policy::AnyOne`] does the same, then picks one reachable node at random.
//! - [`Policy::FirstOne`] returns on the first result of any kind. If that
//!   first result is unreachable the answer is "none", even if a later probe
//!   would have succeeded. Use `All` or `AnyOne` for a best-of-many answer.

use crate::error::{Error, Result};
use crate::node::ToxNode;
use crate::probe::{Probe, TcpProbe};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Extra time allowed on top of the probe timeout for collecting results.
pub const AGGREGATION_GRACE: Duration = Duration::from_millis(250);

/// Which probe outcomes are returned and when a scheduling call ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Every reachable node.
    All,
    /// One reachable node chosen uniformly at random.
    AnyOne,
    /// The node behind the first probe result, if that result is alive.
    FirstOne,
}

/// Outcome of probing a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub node: ToxNode,
    pub alive: bool,
}

/// What a scheduling call selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Reachable nodes in arrival order ([`Policy::All`]).
    Reachable(Vec<ToxNode>),
    /// At most one node ([`Policy::AnyOne`], [`Policy::FirstOne`]).
    One(Option<ToxNode>),
}

impl Selection {
    /// Flatten into a list of nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<ToxNode> {
        match self {
            Selection::Reachable(nodes) => nodes,
            Selection::One(node) => node.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Reachable(nodes) => nodes.is_empty(),
            Selection::One(node) => node.is_none(),
        }
    }
}

/// Fans probes out over a set of nodes and applies a [`Policy`].
pub struct Scheduler {
    probe: Arc<dyn Probe>,
    /// Seeded once at construction, never per call.
    rng: Mutex<StdRng>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Arc::new(TcpProbe))
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Create a scheduler with an entropy-seeded random source.
    #[must_use]
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self::with_rng(probe, StdRng::from_entropy())
    }

    /// Create a scheduler whose random selections are reproducible.
    #[must_use]
    pub fn with_seed(probe: Arc<dyn Probe>, seed: u64) -> Self {
        Self::with_rng(probe, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(probe: Arc<dyn Probe>, rng: StdRng) -> Self {
        Self {
            probe,
            rng: Mutex::new(rng),
        }
    }

    /// Probe `nodes` concurrently and select according to `policy`.
    ///
    /// Only [`Policy::FirstOne`] fails, with [`Error::NoCandidates`], when
    /// `nodes` is empty. The other policies return an empty selection.
    pub async fn schedule(
        &self,
        nodes: Vec<ToxNode>,
        timeout: Duration,
        policy: Policy,
    ) -> Result<Selection> {
        match policy {
            Policy::All => Ok(Selection::Reachable(self.all(nodes, timeout).await)),
            Policy::AnyOne => Ok(Selection::One(self.any_one(nodes, timeout).await)),
            Policy::FirstOne => Ok(Selection::One(self.first_one(nodes, timeout).await?)),
        }
    }

    /// Wait for every probe and return the reachable nodes.
    pub async fn all(&self, nodes: Vec<ToxNode>, timeout: Duration) -> Vec<ToxNode> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let launched = nodes.len();
        let deadline = timeout.saturating_add(AGGREGATION_GRACE);
        let mut rx = self.launch(nodes, timeout);
        let mut alive = Vec::new();
        let mut received = 0usize;

        let collect = async {
            while let Some(result) = rx.recv().await {
                received += 1;
                if result.alive {
                    alive.push(result.node);
                }
            }
        };
        let completed = tokio::time::timeout(deadline, collect)
            .await
            .is_ok();
        if !completed {
            warn!(
                "Probe aggregation deadline passed with {}/{} results",
                received, launched
            );
        }

        info!(
            "Probed {} nodes: {} reachable, {} unreachable or lost",
            launched,
            alive.len(),
            launched - alive.len()
        );
        alive
    }

    /// Wait for every probe and return one reachable node at random.
    pub async fn any_one(&self, nodes: Vec<ToxNode>, timeout: Duration) -> Option<ToxNode> {
        let alive = self.all(nodes, timeout).await;
        self.choose(&alive).await
    }

    /// Return as soon as the first probe result arrives.
    ///
    /// Probes still in flight are left to finish on their own.
    pub async fn first_one(
        &self,
        nodes: Vec<ToxNode>,
        timeout: Duration,
    ) -> Result<Option<ToxNode>> {
        if nodes.is_empty() {
            return Err(Error::NoCandidates);
        }

        let launched = nodes.len();
        let deadline = timeout.saturating_add(AGGREGATION_GRACE);
        let mut rx = self.launch(nodes, timeout);

        match tokio::time::timeout(deadline, rx.recv()).await {
            Ok(Some(ProbeResult { node, alive: true })) => {
                info!("First of {} probes answered: {}", launched, node);
                Ok(Some(node))
            }
            Ok(Some(ProbeResult { node, alive: false })) => {
                info!("First of {} probes reported {} unreachable", launched, node);
                Ok(None)
            }
            Ok(None) => {
                warn!("All {} probe tasks ended without a result", launched);
                Ok(None)
            }
            Err(_) => {
                warn!("No probe result within {:?}", deadline);
                Ok(None)
            }
        }
    }

    /// Pick one of `nodes` uniformly at random.
    pub async fn choose(&self, nodes: &[ToxNode]) -> Option<ToxNode> {
        let mut rng = self.rng.lock().await;
        nodes.choose(&mut *rng).cloned()
    }

    fn launch(
        &self,
        nodes: Vec<ToxNode>,
        timeout: Duration,
    ) -> mpsc::UnboundedReceiver<ProbeResult> {
        let (tx, rx) = mpsc::unbounded_channel();

        for node in nodes {
            let tx = tx.clone();
            let probe = Arc::clone(&self.probe);
            tokio::spawn(async move {
                let alive = probe.probe(&node, timeout).await;
                if tx.send(ProbeResult { node, alive }).is_err() {
                    debug!("Probe result discarded, selection already made");
                }
            });
        }

        rx
    }
}
