//! Sender admission rules.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use streamgate_interface::{PeerKind, PeerRecord};
use tracing::{debug, instrument};

/// Who may talk to the bot.
///
/// Only private chats with users are served. An empty allow-list admits
/// every user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    allowed_users: HashSet<i64>,
}

impl AccessPolicy {
    /// Create a policy from an allow-list.
    pub fn new(allowed_users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed_users: allowed_users.into_iter().collect(),
        }
    }

    /// Whether every user is admitted.
    pub fn is_open(&self) -> bool {
        self.allowed_users.is_empty()
    }

    /// Require the chat to be a private chat with a user.
    ///
    /// `peer` is the peer store's record for the chat; an unknown chat is
    /// rejected as well.
    #[instrument(skip(self, peer))]
    pub fn check_private_chat(&self, chat_id: i64, peer: Option<&PeerRecord>) -> SecurityResult<()> {
        match peer {
            Some(record) if record.kind == PeerKind::User => Ok(()),
            _ => {
                debug!("Ignoring message from non-private chat");
                Err(SecurityError::new(SecurityErrorKind::NotPrivateChat(chat_id)))
            }
        }
    }

    /// Require the user to be on the allow-list, if one is configured.
    #[instrument(skip(self))]
    pub fn check_user(&self, user_id: i64) -> SecurityResult<()> {
        if self.is_open() || self.allowed_users.contains(&user_id) {
            return Ok(());
        }
        debug!("User not in allow list");
        Err(SecurityError::new(SecurityErrorKind::PermissionDenied {
            user_id,
            reason: "User not in allow list".to_string(),
        }))
    }

    /// Run both checks, private chat first.
    pub fn check(&self, chat_id: i64, peer: Option<&PeerRecord>) -> SecurityResult<()> {
        self.check_private_chat(chat_id, peer)?;
        self.check_user(chat_id)
    }
}
