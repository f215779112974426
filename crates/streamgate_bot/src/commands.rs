//! Command handling.
//!
//! The protocol client delivers each incoming message to
//! [`CommandRegistry::dispatch`], which hands it to the first handler that
//! claims it. Handlers are the only place that turns pipeline results and
//! errors into user-facing text.
//!
//! # Architecture
//!
//! - `CommandHandler` - one command (start, link issuance, ...)
//! - `CommandRegistry` - ordered list of handlers, first match wins
//! - `Reply` - text plus URL buttons for the protocol client to send

use crate::{AppContext, IssuedLink};
use async_trait::async_trait;
use std::sync::Arc;
use streamgate_core::{MessageMedia, is_supported_media};
use streamgate_error::{MediaErrorKind, StreamgateErrorKind};
use streamgate_security::{GateDecision, SecurityErrorKind};
use tracing::{debug, error, info, instrument, warn};

/// User-facing texts.
pub mod messages {
    /// Sent to users outside the allow-list.
    pub const NOT_ALLOWED: &str = "You are not allowed to use this bot.";
    /// Sent by `/start` to users who must join the channel.
    pub const JOIN_TO_USE: &str = "Please join our channel to use this bot.";
    /// Sent instead of a link to users who must join the channel.
    pub const JOIN_FOR_LINKS: &str = "Please join our channel to get stream links.";
    /// Sent for media the pipeline cannot stream.
    pub const UNSUPPORTED: &str = "Sorry, this message type is unsupported.";
    /// Sent when issuing a link failed.
    pub const ISSUE_FAILED: &str = "Sorry, something went wrong while issuing your link. Please try again later.";
    /// Reply to `/start`.
    pub const WELCOME: &str = "Need a direct streamable link to a file? Send it my way!";
    /// Label of the join button.
    pub const JOIN_BUTTON: &str = "Join Channel";
    /// Label of the download button.
    pub const DOWNLOAD_BUTTON: &str = "Download";
    /// Label of the stream button.
    pub const STREAM_BUTTON: &str = "Stream";
}

/// A message delivered by the protocol client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat the message was sent in; equals the user ID for private chats
    pub chat_id: i64,
    /// Message ID inside that chat
    pub message_id: i32,
    /// Text or caption
    pub text: Option<String>,
    /// Attached media
    pub media: Option<MessageMedia>,
}

/// A URL button under a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Label
    pub text: String,
    /// Target URL
    pub url: String,
}

impl Button {
    fn new(text: &str, url: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            url: url.into(),
        }
    }
}

/// A reply for the protocol client to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Message text
    pub text: String,
    /// Buttons in a single row
    pub buttons: Vec<Button>,
    /// Message being replied to
    pub reply_to: Option<i32>,
}

impl Reply {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            reply_to: None,
        }
    }
}

/// Handles one kind of incoming message.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether this handler claims the message.
    fn matches(&self, message: &IncomingMessage) -> bool;

    /// Handle a claimed message. `None` means stay silent.
    async fn handle(&self, ctx: &AppContext, message: &IncomingMessage) -> Option<Reply>;
}

/// Ordered set of command handlers.
pub struct CommandRegistry {
    handlers: Vec<Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        debug!("Creating new CommandRegistry");
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registry with `/start` and link issuance.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(StartCommand).register(LinkCommand);
        registry
    }

    /// Append a handler; earlier handlers take precedence.
    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) -> &mut Self {
        info!(handler = handler.name(), "Registering command handler");
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Names of registered handlers, in order.
    pub fn names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }

    /// Route a message to the first matching handler.
    #[instrument(skip(self, ctx, message), fields(chat_id = message.chat_id, message_id = message.message_id))]
    pub async fn dispatch(&self, ctx: &AppContext, message: &IncomingMessage) -> Option<Reply> {
        let Some(handler) = self.handlers.iter().find(|h| h.matches(message)) else {
            debug!("No handler for message");
            return None;
        };
        debug!(handler = handler.name(), "Dispatching message");
        handler.handle(ctx, message).await
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Replies to `/start`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartCommand;

#[async_trait]
impl CommandHandler for StartCommand {
    fn name(&self) -> &str {
        "start"
    }

    fn matches(&self, message: &IncomingMessage) -> bool {
        message
            .text
            .as_deref()
            .and_then(|text| text.split_whitespace().next())
            .is_some_and(|command| command == "/start" || command.starts_with("/start@"))
    }

    async fn handle(&self, ctx: &AppContext, message: &IncomingMessage) -> Option<Reply> {
        if let Err(reply) = admit(ctx, message, messages::JOIN_TO_USE).await {
            return reply;
        }
        Some(Reply::text(messages::WELCOME))
    }
}

/// Issues a stream link for any message carrying media.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCommand;

#[async_trait]
impl CommandHandler for LinkCommand {
    fn name(&self) -> &str {
        "link"
    }

    fn matches(&self, message: &IncomingMessage) -> bool {
        message.media.is_some()
    }

    #[instrument(skip(self, ctx, message), fields(chat_id = message.chat_id, message_id = message.message_id))]
    async fn handle(&self, ctx: &AppContext, message: &IncomingMessage) -> Option<Reply> {
        if let Err(reply) = admit(ctx, message, messages::JOIN_FOR_LINKS).await {
            return reply;
        }

        let supported = message.media.as_ref().is_some_and(is_supported_media);
        if !supported {
            debug!("Unsupported media kind");
            return Some(Reply::text(messages::UNSUPPORTED));
        }

        match ctx
            .links()
            .issue_link(message.chat_id, message.message_id)
            .await
        {
            Ok(link) => Some(link_reply(&link, message.message_id)),
            Err(e) => match e.kind() {
                StreamgateErrorKind::Media(media)
                    if matches!(media.kind(), MediaErrorKind::UnsupportedMediaKind(_)) =>
                {
                    warn!(error = %e, "Archived media is unsupported");
                    Some(Reply::text(messages::UNSUPPORTED))
                }
                _ => {
                    error!(error = %e, "Failed to issue link");
                    if *ctx.config().dev() {
                        Some(Reply::text(format!("{}\n\n{}", messages::ISSUE_FAILED, e)))
                    } else {
                        Some(Reply::text(messages::ISSUE_FAILED))
                    }
                }
            },
        }
    }
}

/// Run the access policy and the subscription gate.
///
/// `Err(None)` means the message is ignored silently.
async fn admit(
    ctx: &AppContext,
    message: &IncomingMessage,
    join_text: &str,
) -> Result<(), Option<Reply>> {
    let peer = ctx.peers().peer_by_id(message.chat_id);
    if let Err(e) = ctx.policy().check(message.chat_id, peer.as_ref()) {
        return match e.kind() {
            SecurityErrorKind::NotPrivateChat(_) => Err(None),
            _ => {
                debug!(error = %e, "Sender rejected");
                Err(Some(Reply::text(messages::NOT_ALLOWED)))
            }
        };
    }

    match ctx.gate().check(message.chat_id).await {
        Ok(GateDecision::Allow) => Ok(()),
        Ok(GateDecision::Deny(reason)) => {
            debug!(%reason, "Subscription required");
            Err(Some(join_reply(ctx, join_text)))
        }
        Err(e) => {
            error!(error = %e, user_id = message.chat_id, "Error checking subscription status");
            Err(Some(join_reply(ctx, join_text)))
        }
    }
}

fn join_reply(ctx: &AppContext, text: &str) -> Reply {
    let mut reply = Reply::text(text);
    if let Some(url) = ctx.gate().join_url() {
        reply.buttons.push(Button::new(messages::JOIN_BUTTON, url));
    }
    reply
}

fn link_reply(link: &IssuedLink, reply_to: i32) -> Reply {
    let text = format!(
        "File Name: {}\n\nDownload Link:\n{}",
        link.descriptor().name(),
        link.url()
    );

    // Chat clients reject localhost URLs in buttons.
    let buttons = if link.url().starts_with("http://localhost") {
        Vec::new()
    } else {
        let mut buttons = vec![Button::new(messages::DOWNLOAD_BUTTON, link.download_url().clone())];
        if link.descriptor().is_video() {
            buttons.push(Button::new(messages::STREAM_BUTTON, link.url().clone()));
        }
        buttons
    };

    Reply {
        text,
        buttons,
        reply_to: Some(reply_to),
    }
}
