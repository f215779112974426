//! Request and response shapes exchanged with the protocol client.

use crate::InputPeer;
use streamgate_core::MessageMedia;

/// A chat returned by channel lookups and username resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedChat {
    /// A channel or supergroup the client can address
    Channel {
        /// Channel ID
        id: i64,
        /// Access hash
        access_hash: i64,
        /// Channel title
        title: String,
        /// Public username, if any
        username: Option<String>,
    },
    /// A basic group
    Chat {
        /// Chat ID
        id: i64,
        /// Chat title
        title: String,
    },
    /// A channel the client was banned from or can no longer see
    Forbidden {
        /// Channel ID
        id: i64,
    },
}

/// A regular message stored in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Message ID inside the channel
    pub id: i32,
    /// Attached media, if any
    pub media: Option<MessageMedia>,
}

/// Result slot for one requested channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchivedMessage {
    /// The message exists
    Message(ChannelMessage),
    /// A service message (joins, pins, ...)
    Service {
        /// Message ID
        id: i32,
    },
    /// The message was deleted or never existed
    Empty {
        /// Message ID
        id: i32,
    },
}

/// One record of an update batch returned by a forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRecord {
    /// Assigns a server message ID to a client correlation ID
    MessageId {
        /// Assigned message ID
        id: i32,
        /// Correlation ID sent with the request
        random_id: i64,
    },
    /// A message was posted to a channel
    NewChannelMessage(ChannelMessage),
    /// A message was posted to a private chat or basic group
    NewMessage(ChannelMessage),
    /// Any other update kind
    Other(String),
}

/// Forward request for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    /// Chat the message is forwarded from
    pub from_peer: InputPeer,
    /// Chat the message is forwarded to
    pub to_peer: InputPeer,
    /// Message IDs inside `from_peer`
    pub message_ids: Vec<i32>,
    /// One fresh correlation ID per message
    pub random_ids: Vec<i64>,
}
