//! Contracts for the chat-protocol client that streamgate drives.
//!
//! The protocol client itself (session storage, transport, update polling)
//! lives outside this workspace. The link pipeline only needs:
//! - a [`PeerStore`] to look up and register addressable peers
//! - a [`ChatApi`] handle for the handful of RPCs it issues
//! - a [`ClientConnector`] that the bootstrap races against a deadline

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod peer;
mod rpc;
mod traits;
mod types;

pub use peer::{InputChannel, InputPeer, MemoryPeerStore, PeerKind, PeerRecord};
pub use rpc::RpcError;
pub use traits::{ChatApi, ClientConnector, PeerStore};
pub use types::{ArchivedMessage, ChannelMessage, ForwardRequest, ResolvedChat, UpdateRecord};
