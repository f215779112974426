//! Peer records and the in-memory peer store.

use crate::PeerStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a peer known to the protocol client.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PeerKind {
    /// A user (private chat)
    User,
    /// A basic group
    Chat,
    /// A channel or supergroup
    Channel,
}

/// A peer as stored by the protocol client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    /// Logical peer ID
    pub id: i64,
    /// Access hash granted to this client
    pub access_hash: i64,
    /// Peer kind
    pub kind: PeerKind,
    /// Public username, if any
    pub username: Option<String>,
}

/// Addressable form of a peer used in RPC requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPeer {
    /// The peer is unknown to the store
    Empty,
    /// A user
    User {
        /// User ID
        user_id: i64,
        /// Access hash
        access_hash: i64,
    },
    /// A basic group
    Chat {
        /// Chat ID
        chat_id: i64,
    },
    /// A channel
    Channel {
        /// Channel ID
        channel_id: i64,
        /// Access hash
        access_hash: i64,
    },
}

impl InputPeer {
    /// Whether the store had nothing for the requested ID.
    pub fn is_empty(&self) -> bool {
        matches!(self, InputPeer::Empty)
    }
}

impl From<&PeerRecord> for InputPeer {
    fn from(record: &PeerRecord) -> Self {
        match record.kind {
            PeerKind::User => InputPeer::User {
                user_id: record.id,
                access_hash: record.access_hash,
            },
            PeerKind::Chat => InputPeer::Chat { chat_id: record.id },
            PeerKind::Channel => InputPeer::Channel {
                channel_id: record.id,
                access_hash: record.access_hash,
            },
        }
    }
}

/// Addressable form of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputChannel {
    /// Channel ID
    pub channel_id: i64,
    /// Access hash, 0 when not yet known
    pub access_hash: i64,
}

impl From<InputChannel> for InputPeer {
    fn from(channel: InputChannel) -> Self {
        InputPeer::Channel {
            channel_id: channel.channel_id,
            access_hash: channel.access_hash,
        }
    }
}

/// Peer store kept entirely in memory.
///
/// Suitable for tests and for protocol clients that do not persist their
/// peer cache. Registration is idempotent: adding a peer that is already
/// present replaces it with the newer record.
#[derive(Debug, Default)]
pub struct MemoryPeerStore {
    peers: RwLock<HashMap<i64, PeerRecord>>,
}

impl MemoryPeerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of known peers.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

impl PeerStore for MemoryPeerStore {
    fn peer_by_id(&self, id: i64) -> Option<PeerRecord> {
        self.peers.read().get(&id).cloned()
    }

    fn input_peer_by_id(&self, id: i64) -> InputPeer {
        self.peers
            .read()
            .get(&id)
            .map(InputPeer::from)
            .unwrap_or(InputPeer::Empty)
    }

    fn add_peer(&self, record: PeerRecord) {
        tracing::debug!(id = record.id, kind = %record.kind, "Registering peer");
        self.peers.write().insert(record.id, record);
    }
}
