//! Bootstrap node candidates as advertised by the registry.
//!
//! A [`ToxNode`] is built once per registry fetch and never mutated afterwards.
//! Probing only ever reads a node and produces a derived reachability flag.
//!
//! # Address Families
//!
//! Nodes advertise an IPv4 address and, optionally, an IPv6 address. Only the
//! IPv4 address is used for liveness probing; the IPv6 address is carried
//! through unchanged for callers that want it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// A single bootstrap node candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToxNode {
    /// IPv4 address or host name (e.g., "85.143.221.42")
    pub ipv4: String,
    /// IPv6 address, empty when the node publishes none
    pub ipv6: String,
    /// Tox UDP/TCP port
    pub port: u16,
    /// Decoded DHT public key (may be empty)
    #[serde(with = "hex_bytes")]
    pub public_key: Vec<u8>,
    /// Maintainer name
    pub maintainer: String,
    /// Location tag (usually a country code)
    pub location: String,
    /// Whether the registry claims the node is up. Not verified.
    pub status: bool,
}

impl ToxNode {
    /// Whether this node carries enough information to be probed.
    #[must_use]
    pub fn is_probeable(&self) -> bool {
        !self.ipv4.trim().is_empty()
    }

    /// The `host:port` string used for probing.
    #[must_use]
    pub fn probe_target(&self) -> String {
        format!("{}:{}", self.ipv4.trim(), self.port)
    }

    /// Get the IPv4 socket address, if the advertised address is a literal.
    #[must_use]
    pub fn socket_addr_v4(&self) -> Option<SocketAddr> {
        self.ipv4
            .trim()
            .parse::<Ipv4Addr>()
            .ok()
            .map(|ip| SocketAddr::V4(SocketAddrV4::new(ip, self.port)))
    }

    /// Whether an IPv6 address is advertised.
    #[must_use]
    pub fn has_ipv6(&self) -> bool {
        !self.ipv6.trim().is_empty()
    }

    /// Public key as an upper-case hex string, as published by the registry.
    #[must_use]
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(&self.public_key)
    }
}

impl fmt::Display for ToxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToxNode {} at {}:{}", self.maintainer, self.ipv4, self.port)
    }
}

/// Keep only the nodes the registry marks as up.
#[must_use]
pub fn advertised_up(nodes: Vec<ToxNode>) -> Vec<ToxNode> {
    nodes.into_iter().filter(|n| n.status).collect()
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) fn test_node(ipv4: &str, port: u16) -> ToxNode {
    ToxNode {
        ipv4: ipv4.to_string(),
        ipv6: String::new(),
        port,
        public_key: vec![0xAB, 0xCD],
        maintainer: format!("node-{port}"),
        location: "DE".to_string(),
        status: true,
    }
}
