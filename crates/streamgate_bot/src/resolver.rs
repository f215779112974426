//! Durable references through the archive channel.
//!
//! User messages are ephemeral: the user may delete them or the chat may
//! vanish. Forwarding a message into a private, bot-controlled channel gives
//! it a stable ID that links can point at.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use streamgate_core::{DurableMessageReference, MessageMedia};
use streamgate_error::{ArchiveError, ArchiveErrorKind};
use streamgate_interface::{
    ArchivedMessage, ChannelMessage, ChatApi, ForwardRequest, InputChannel, InputPeer, PeerKind,
    PeerRecord, PeerStore, ResolvedChat, RpcError, UpdateRecord,
};
use tracing::{debug, info, instrument, warn};

/// Result of copying a message into the archive channel.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ForwardedMessage {
    reference: DurableMessageReference,
    media: Option<MessageMedia>,
}

impl ForwardedMessage {
    /// Split into the reference and the archived copy's media.
    pub fn into_parts(self) -> (DurableMessageReference, Option<MessageMedia>) {
        (self.reference, self.media)
    }
}

/// Resolves the archive channel and moves messages into it.
///
/// The peer cache belongs to the protocol client; the resolver only reads
/// it and registers the archive channel on a miss.
pub struct ArchiveResolver {
    api: Arc<dyn ChatApi>,
    peers: Arc<dyn PeerStore>,
    archive_id: i64,
    request_timeout: Duration,
}

impl ArchiveResolver {
    /// Create a resolver for the archive channel `archive_id`.
    pub fn new(
        api: Arc<dyn ChatApi>,
        peers: Arc<dyn PeerStore>,
        archive_id: i64,
        request_timeout: Duration,
    ) -> Self {
        Self {
            api,
            peers,
            archive_id,
            request_timeout,
        }
    }

    /// ID of the archive channel.
    pub fn archive_id(&self) -> i64 {
        self.archive_id
    }

    /// Addressable form of the archive channel.
    ///
    /// # Errors
    ///
    /// Returns `PeerResolutionFailed` when the channel cannot be found or
    /// the peer store holds something other than a channel for its ID.
    #[instrument(skip(self), fields(archive_id = self.archive_id))]
    pub async fn archive_channel(&self) -> Result<InputChannel, ArchiveError> {
        match self.peers.input_peer_by_id(self.archive_id) {
            InputPeer::Channel {
                channel_id,
                access_hash,
            } => {
                debug!("Archive channel found in peer store");
                return Ok(InputChannel {
                    channel_id,
                    access_hash,
                });
            }
            InputPeer::Empty => {}
            other => {
                warn!(peer = ?other, "Archive ID is not a channel");
                return Err(ArchiveError::new(ArchiveErrorKind::PeerResolutionFailed(
                    format!("peer {} is not a channel", self.archive_id),
                )));
            }
        }

        let lookup = [InputChannel {
            channel_id: self.archive_id,
            access_hash: 0,
        }];
        let chats = self
            .upstream("channels.getChannels", self.api.get_channels(&lookup))
            .await?;

        let Some(first) = chats.into_iter().next() else {
            return Err(ArchiveError::new(ArchiveErrorKind::PeerResolutionFailed(
                "no channels found".to_string(),
            )));
        };
        let ResolvedChat::Channel {
            id,
            access_hash,
            username,
            ..
        } = first
        else {
            return Err(ArchiveError::new(ArchiveErrorKind::PeerResolutionFailed(
                format!("{} did not resolve to a channel", self.archive_id),
            )));
        };

        self.peers.add_peer(PeerRecord {
            id,
            access_hash,
            kind: PeerKind::Channel,
            username,
        });
        info!(channel_id = id, "Resolved archive channel");
        Ok(InputChannel {
            channel_id: id,
            access_hash,
        })
    }

    /// Forward a user's message into the archive channel.
    ///
    /// # Errors
    ///
    /// - `UnknownSourcePeer` when the source chat is not in the peer store
    /// - `PeerResolutionFailed` when the archive channel cannot be resolved
    /// - `MalformedForwardAck` when the acknowledgment lacks the assigned ID
    ///   or the archived message
    /// - `Upstream` / `UpstreamTimeout` when the forward itself fails
    #[instrument(skip(self), fields(archive_id = self.archive_id))]
    pub async fn forward(
        &self,
        source_chat_id: i64,
        source_message_id: i32,
    ) -> Result<ForwardedMessage, ArchiveError> {
        let from_peer = self.peers.input_peer_by_id(source_chat_id);
        if from_peer.is_empty() {
            warn!("Source chat is not a known peer");
            return Err(ArchiveError::new(ArchiveErrorKind::UnknownSourcePeer(
                source_chat_id,
            )));
        }

        let archive = self.archive_channel().await?;
        let random_id: i64 = rand::random();
        let request = ForwardRequest {
            from_peer,
            to_peer: archive.into(),
            message_ids: vec![source_message_id],
            random_ids: vec![random_id],
        };

        let updates = self
            .upstream("messages.forwardMessages", self.api.forward_messages(request))
            .await?;
        let archived = parse_forward_ack(updates, random_id)?;

        info!(stable_message_id = archived.id, "Archived message");
        Ok(ForwardedMessage {
            reference: DurableMessageReference::new(archived.id, source_chat_id, source_message_id),
            media: archived.media,
        })
    }

    /// Read an archived message back by its stable ID.
    ///
    /// # Errors
    ///
    /// Returns `MessageGone` when the archived copy was deleted.
    #[instrument(skip(self), fields(archive_id = self.archive_id))]
    pub async fn fetch_archived(&self, stable_message_id: i32) -> Result<ChannelMessage, ArchiveError> {
        let archive = self.archive_channel().await?;
        let ids = [stable_message_id];
        let messages = self
            .upstream(
                "channels.getMessages",
                self.api.get_channel_messages(archive, &ids),
            )
            .await?;

        match messages.into_iter().next() {
            Some(ArchivedMessage::Message(message)) => Ok(message),
            _ => {
                warn!(stable_message_id, "Archived message is gone");
                Err(ArchiveError::new(ArchiveErrorKind::MessageGone(
                    stable_message_id,
                )))
            }
        }
    }

    async fn upstream<T, F>(&self, call: &str, request: F) -> Result<T, ArchiveError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(call, error = %err, "Upstream call failed");
                Err(ArchiveError::new(ArchiveErrorKind::Upstream {
                    call: call.to_string(),
                    reason: err.to_string(),
                }))
            }
            Err(_) => {
                warn!(call, "Upstream call timed out");
                Err(ArchiveError::new(ArchiveErrorKind::UpstreamTimeout {
                    call: call.to_string(),
                    timeout_ms: self.request_timeout.as_millis() as u64,
                }))
            }
        }
    }
}

/// Pick the archived message out of a forward acknowledgment.
///
/// The batch must assign a message ID to our correlation ID and carry the
/// new channel message with that ID.
fn parse_forward_ack(
    updates: Vec<UpdateRecord>,
    random_id: i64,
) -> Result<ChannelMessage, ArchiveError> {
    let assigned = updates
        .iter()
        .find_map(|update| match update {
            UpdateRecord::MessageId { id, random_id: rid } if *rid == random_id => Some(*id),
            _ => None,
        })
        .ok_or_else(|| {
            ArchiveError::new(ArchiveErrorKind::MalformedForwardAck(
                "no message ID assigned to the forward".to_string(),
            ))
        })?;

    updates
        .into_iter()
        .find_map(|update| match update {
            UpdateRecord::NewChannelMessage(message) if message.id == assigned => Some(message),
            _ => None,
        })
        .ok_or_else(|| {
            ArchiveError::new(ArchiveErrorKind::MalformedForwardAck(format!(
                "no channel message with ID {}",
                assigned
            )))
        })
}
