//! Tox Dynamic Bootstrap Discovery
//!
//! This crate finds Tox bootstrap nodes that are live right now, so that a
//! client can join the DHT without relying on a stale hardcoded list:
//!
//! - **Registry**: Fetches and parses the public node table
//! - **Probe**: Checks a node's reachability with a single bounded TCP connect
//! - **Scheduler**: Probes every candidate in parallel and applies a selection policy
//! - **Discovery**: The public fetch operations tying the above together
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Bootstrap Discovery                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │   ┌──────────────┐   Vec<ToxNode>   ┌──────────────────────────┐    │
//! │   │   Registry   │─────────────────►│        Scheduler         │    │
//! │   │ (NodeSource) │  advertised up   │  one task per node       │    │
//! │   └──────────────┘                  │  ┌───────┐   ┌───────┐   │    │
//! │                                     │  │ probe │...│ probe │   │    │
//! │                                     │  └───┬───┘   └───┬───┘   │    │
//! │                                     │      └──► mpsc ◄─┘       │    │
//! │                                     │   All | AnyOne | FirstOne│    │
//! │                                     └────────────┬─────────────┘    │
//! │                                                  ▼                  │
//! │                                         selected ToxNode(s)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tox_dynboot::{Discovery, DiscoveryConfig};
//!
//! let discovery = Discovery::from_config(&DiscoveryConfig::default())?;
//! let alive = discovery.fetch_reachable(Duration::from_secs(2)).await?;
//! println!("{} nodes reachable", alive.len());
//! ```
//!
//! Only IPv4 is probed. Nodes reachable solely over IPv6 are reported as
//! unreachable.

pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod node;
pub mod probe;
pub mod registry;
pub mod scheduler;

pub use config::DiscoveryConfig;
pub use discovery::Discovery;
pub use error::{Error, ParseError, Result};
pub use node::ToxNode;
pub use probe::{Probe, TcpProbe, probe};
pub use registry::{NodeSource, StaticSource, TableLayout, WikiRegistry, parse_nodes};
pub use scheduler::{AGGREGATION_GRACE, Policy, ProbeResult, Scheduler, Selection};
