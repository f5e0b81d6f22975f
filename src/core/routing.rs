//! core::routing
//!
//! Helpers for services that route clients through their shuffle shard.
//!
//! A typical request path derives a [`ClientId`] from the client's address,
//! computes the client's shard with a [`Shuffler`](super::shuffler::Shuffler),
//! and then picks one endpoint inside that shard with [`pick_endpoint`].
//! [`overlap`] measures how much two shards share, which bounds how far a
//! failure reached through one identifier can spread to another.

use std::fmt;
use std::net::SocketAddr;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::lattice::Lattice;
use super::types::Coordinate;

/// Stable identifier for a client, derived from its network address.
///
/// The port of a socket address is ignored, so repeated connections from
/// one host map to the same identifier.
///
/// # Example
///
/// ```
/// use shuffleshard::core::routing::ClientId;
///
/// let a = ClientId::from_address("10.1.2.3:51000");
/// let b = ClientId::from_address("10.1.2.3:51001");
/// assert_eq!(a, b);
/// assert_ne!(a, ClientId::from_address("10.1.2.4:51000"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId([u8; 32]);

impl ClientId {
    /// Derive the identifier for a client address.
    ///
    /// Addresses that do not parse as `ip:port` are hashed verbatim (after
    /// trimming whitespace).
    pub fn from_address(address: &str) -> Self {
        let host = match address.trim().parse::<SocketAddr>() {
            Ok(socket) => socket.ip().to_string(),
            Err(_) => address.trim().to_string(),
        };

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(host.as_bytes()));
        Self(bytes)
    }

    /// Identifier bytes, suitable as a shuffle identifier.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// First eight identifier bytes as a big-endian `u64`.
    pub fn route_key(&self) -> u64 {
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(prefix)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for ClientId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

/// Pick the endpoint a client should use within its shard.
///
/// Endpoints are indexed in the shard's sector order; the client's route key
/// selects one. Returns `None` for a shard without endpoints.
pub fn pick_endpoint<'a, T>(shard: &'a Lattice<T>, client: &ClientId) -> Option<&'a T> {
    let count = shard.endpoint_count();
    if count == 0 {
        return None;
    }
    let index = (client.route_key() % count as u64) as usize;
    shard.endpoints().nth(index)
}

/// What two shards have in common.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap<T> {
    /// Sectors present in both shards, in coordinate order
    pub sectors: Vec<Coordinate>,
    /// Distinct endpoints present in both shards, in the first shard's order
    pub endpoints: Vec<T>,
}

impl<T> Overlap<T> {
    /// True if the shards share no endpoint.
    pub fn is_disjoint(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Compute the overlap between two shards.
///
/// # Example
///
/// ```
/// use shuffleshard::core::lattice::Lattice;
/// use shuffleshard::core::routing::overlap;
///
/// let mut a = Lattice::new(["cell"]);
/// a.add_endpoints_for_sector(&["x"], ["1", "2"]).unwrap();
/// let mut b = Lattice::new(["cell"]);
/// b.add_endpoints_for_sector(&["x"], ["2", "3"]).unwrap();
///
/// let shared = overlap(&a, &b);
/// assert_eq!(shared.sectors.len(), 1);
/// assert_eq!(shared.endpoints, vec!["2"]);
/// ```
pub fn overlap<T: Clone + PartialEq>(a: &Lattice<T>, b: &Lattice<T>) -> Overlap<T> {
    let sectors = a
        .sectors()
        .filter(|(coordinate, _)| b.sector(coordinate).is_ok())
        .map(|(coordinate, _)| coordinate.clone())
        .collect();

    let mut endpoints: Vec<T> = Vec::new();
    for endpoint in a.endpoints() {
        if !endpoints.contains(endpoint) && b.endpoints().any(|e| e == endpoint) {
            endpoints.push(endpoint.clone());
        }
    }

    Overlap { sectors, endpoints }
}
