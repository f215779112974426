//! Force-subscription gate.

use crate::{SecurityError, SecurityErrorKind, SecurityResult};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use streamgate_interface::{ChatApi, InputChannel, InputPeer, ResolvedChat, RpcError};
use tracing::{debug, error, instrument, warn};

// `name`, `@name`, `t.me/name` or `https://t.me/name`
static CHANNEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?(?:t\.me/|telegram\.me/)?@?([A-Za-z0-9_]{4,32})/?$")
        .expect("Valid channel regex")
});

/// Participant errors that mean "not a member" rather than "unknown".
const NOT_SUBSCRIBED_ERRORS: &[&str] = &[
    "USER_NOT_PARTICIPANT",
    "PARTICIPANT_NOT_EXIST",
    "CHANNEL_PRIVATE",
    "CHANNEL_INVALID",
    "USER_CHANNEL_INVALID",
];

/// Username errors that mean the channel does not exist.
const NOT_FOUND_ERRORS: &[&str] = &["USERNAME_NOT_OCCUPIED", "USERNAME_INVALID"];

/// Outcome of a subscription check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The user may receive links
    Allow,
    /// The user must join the channel first
    Deny(DenyReason),
}

impl GateDecision {
    /// Whether the user was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

/// Why a user was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DenyReason {
    /// The upstream confirmed the user is not a participant
    #[display("not subscribed")]
    NotSubscribed,
    /// The upstream answer could not be interpreted
    #[display("indeterminate")]
    Indeterminate,
}

/// Normalize a configured channel name to a bare username.
///
/// Returns `None` for an empty setting, which disables the gate.
///
/// # Examples
///
/// ```
/// use streamgate_security::normalize_channel;
///
/// assert_eq!(normalize_channel("@news").unwrap().as_deref(), Some("news"));
/// assert_eq!(normalize_channel("https://t.me/news").unwrap().as_deref(), Some("news"));
/// assert_eq!(normalize_channel("  ").unwrap(), None);
/// assert!(normalize_channel("not a channel").is_err());
/// ```
pub fn normalize_channel(raw: &str) -> SecurityResult<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    CHANNEL_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|name| Some(name.as_str().to_string()))
        .ok_or_else(|| {
            SecurityError::new(SecurityErrorKind::Configuration(format!(
                "Invalid channel name '{}'",
                raw
            )))
        })
}

/// Checks that a user participates in the force-subscription channel.
pub struct SubscriptionGate {
    api: Arc<dyn ChatApi>,
    channel: Option<String>,
    request_timeout: Duration,
}

impl SubscriptionGate {
    /// Create a gate for the configured channel.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the channel name is not a valid
    /// username or channel link.
    pub fn new(
        api: Arc<dyn ChatApi>,
        channel: Option<&str>,
        request_timeout: Duration,
    ) -> SecurityResult<Self> {
        let channel = match channel {
            Some(raw) => normalize_channel(raw)?,
            None => None,
        };
        Ok(Self {
            api,
            channel,
            request_timeout,
        })
    }

    /// The normalized channel username, if the gate is enabled.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Public link users follow to join the channel.
    pub fn join_url(&self) -> Option<String> {
        self.channel.as_ref().map(|name| format!("https://t.me/{}", name))
    }

    /// Decide whether `user_id` may receive links.
    ///
    /// # Errors
    ///
    /// Returns `ChannelNotFound` or `ChannelResolution` when the channel
    /// itself cannot be resolved. Callers treat that as a denial.
    #[instrument(skip(self), fields(channel = self.channel.as_deref()))]
    pub async fn check(&self, user_id: i64) -> SecurityResult<GateDecision> {
        let Some(channel) = self.channel.as_deref() else {
            return Ok(GateDecision::Allow);
        };

        let input = self.resolve_channel(channel).await?;
        let participant = InputPeer::User {
            user_id,
            access_hash: 0,
        };

        let outcome = tokio::time::timeout(
            self.request_timeout,
            self.api.get_channel_participant(input, participant),
        )
        .await;

        match outcome {
            Ok(Ok(())) => {
                debug!("User is subscribed");
                Ok(GateDecision::Allow)
            }
            Ok(Err(err)) if is_not_subscribed(&err) => {
                debug!(error = %err, "User is not subscribed");
                Ok(GateDecision::Deny(DenyReason::NotSubscribed))
            }
            Ok(Err(err)) => {
                error!(error = %err, "Unexpected error checking subscription");
                Ok(GateDecision::Deny(DenyReason::Indeterminate))
            }
            Err(_) => {
                error!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Subscription check timed out"
                );
                Ok(GateDecision::Deny(DenyReason::Indeterminate))
            }
        }
    }

    async fn resolve_channel(&self, channel: &str) -> SecurityResult<InputChannel> {
        let chats = tokio::time::timeout(self.request_timeout, self.api.resolve_username(channel))
            .await
            .map_err(|_| {
                SecurityError::new(SecurityErrorKind::ChannelResolution {
                    channel: channel.to_string(),
                    reason: format!("timed out after {:?}", self.request_timeout),
                })
            })?
            .map_err(|err| {
                warn!(error = %err, "Failed to resolve channel");
                if NOT_FOUND_ERRORS.iter().any(|t| err.is(t)) {
                    SecurityError::new(SecurityErrorKind::ChannelNotFound(channel.to_string()))
                } else {
                    SecurityError::new(SecurityErrorKind::ChannelResolution {
                        channel: channel.to_string(),
                        reason: err.to_string(),
                    })
                }
            })?;

        chats
            .into_iter()
            .find_map(|chat| match chat {
                ResolvedChat::Channel {
                    id, access_hash, ..
                } => Some(InputChannel {
                    channel_id: id,
                    access_hash,
                }),
                _ => None,
            })
            .ok_or_else(|| {
                warn!("Username does not name a channel");
                SecurityError::new(SecurityErrorKind::ChannelNotFound(channel.to_string()))
            })
    }
}

fn is_not_subscribed(err: &RpcError) -> bool {
    NOT_SUBSCRIBED_ERRORS.iter().any(|t| err.is(t))
}
