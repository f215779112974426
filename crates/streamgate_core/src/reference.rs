//! Durable reference to a message copied into the archive channel.

use serde::{Deserialize, Serialize};

/// Where a forwarded message now lives.
///
/// `stable_message_id` is only meaningful inside the archive channel and is
/// the key used by issued links. The reference is created once per forward
/// and never changes; if the archived copy is deleted later, that is only
/// noticed when a link is redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct DurableMessageReference {
    stable_message_id: i32,
    origin_chat_id: i64,
    origin_message_id: i32,
}

impl DurableMessageReference {
    /// Record a completed forward.
    pub fn new(stable_message_id: i32, origin_chat_id: i64, origin_message_id: i32) -> Self {
        Self {
            stable_message_id,
            origin_chat_id,
            origin_message_id,
        }
    }
}
