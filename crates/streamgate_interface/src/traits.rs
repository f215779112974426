//! Trait definitions for the protocol client collaborator.

use crate::{
    ArchivedMessage, ForwardRequest, InputChannel, InputPeer, PeerRecord, ResolvedChat, RpcError,
    UpdateRecord,
};
use async_trait::async_trait;
use streamgate_error::StreamgateResult;

/// Peer cache owned by the protocol client.
///
/// streamgate never keeps its own copy of these mappings: whatever the
/// store returns is the source of truth.
pub trait PeerStore: Send + Sync {
    /// Full record for a logical peer ID.
    fn peer_by_id(&self, id: i64) -> Option<PeerRecord>;

    /// Addressable form of a peer, [`InputPeer::Empty`] when unknown.
    fn input_peer_by_id(&self, id: i64) -> InputPeer;

    /// Register a peer for later lookups. Must be idempotent.
    fn add_peer(&self, record: PeerRecord);
}

/// Authenticated RPC handle of the protocol client.
///
/// Implementations must not retry internally beyond what the transport
/// already does, and dropping a returned future must abandon the call.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// User ID of the bot this handle is logged in as.
    fn self_id(&self) -> i64;

    /// Look up channels by ID.
    async fn get_channels(&self, channels: &[InputChannel]) -> Result<Vec<ResolvedChat>, RpcError>;

    /// Resolve a public username to the chats it names.
    async fn resolve_username(&self, username: &str) -> Result<Vec<ResolvedChat>, RpcError>;

    /// Check that a user participates in a channel.
    ///
    /// Succeeds when the user is a participant; otherwise returns the
    /// protocol error (for example `USER_NOT_PARTICIPANT`).
    async fn get_channel_participant(
        &self,
        channel: InputChannel,
        participant: InputPeer,
    ) -> Result<(), RpcError>;

    /// Forward messages and return the resulting update batch.
    async fn forward_messages(&self, request: ForwardRequest) -> Result<Vec<UpdateRecord>, RpcError>;

    /// Fetch messages of a channel by ID, one slot per requested ID.
    async fn get_channel_messages(
        &self,
        channel: InputChannel,
        ids: &[i32],
    ) -> Result<Vec<ArchivedMessage>, RpcError>;
}

/// Starts the protocol client.
///
/// Consumed by the bootstrap, which runs `connect` on a background task
/// under a deadline.
#[async_trait]
pub trait ClientConnector: Send + 'static {
    /// The connected client handle.
    type Client: Send + 'static;

    /// Connect, authenticate and return the ready client.
    async fn connect(self) -> StreamgateResult<Self::Client>;
}
