//! Liveness probing of bootstrap nodes.
//!
//! ICMP is not available without privileges, so a node counts as alive when a
//! TCP handshake to its IPv4 address either completes or is actively refused.
//! A refusal proves a live host at the network layer even though nothing
//! listens on TCP. Nodes that silently drop SYNs are reported unreachable.
//!
//! Only IPv4 is probed. A node that is reachable over IPv6 alone is reported
//! unreachable.

use crate::node::ToxNode;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpStream, lookup_host};
use tracing::{debug, trace};

/// A reachability check for a single node.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Return whether `node` is reachable, taking at most roughly `timeout`.
    async fn probe(&self, node: &ToxNode, timeout: Duration) -> bool;
}

/// TCP connect probe over IPv4.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, node: &ToxNode, timeout: Duration) -> bool {
        probe(node, timeout).await
    }
}

/// Probe `node` once with a TCP connect bounded by `timeout`.
///
/// Name resolution counts against the same timeout. Any stream that gets
/// established is closed before returning.
pub async fn probe(node: &ToxNode, timeout: Duration) -> bool {
    if timeout.is_zero() || !node.is_probeable() {
        return false;
    }

    let target = node.probe_target();
    match tokio::time::timeout(timeout, connect_v4(&target)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            trace!("{} accepted connection", target);
            true
        }
        Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => {
            trace!("{} refused connection", target);
            true
        }
        Ok(Err(e)) => {
            debug!("{} unreachable: {}", target, e);
            false
        }
        Err(_) => {
            debug!("{} timed out after {:?}", target, timeout);
            false
        }
    }
}

async fn connect_v4(target: &str) -> io::Result<TcpStream> {
    let addr = lookup_host(target)
        .await?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no IPv4 address"))?;
    TcpStream::connect(addr).await
}
