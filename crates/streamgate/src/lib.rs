//! streamgate - access-controlled stream links for files shared with a bot.
//!
//! A user sends the bot a document or photo. The bot forwards it into a
//! private archive channel, normalizes the media into a [`FileDescriptor`]
//! and replies with a link of the form
//! `<host>/stream/<stable message ID>?hash=<short hash>`. The streaming
//! server later redeems the link through [`LinkService::redeem`].
//!
//! # Architecture
//!
//! streamgate is organized as a workspace with focused crates:
//!
//! - `streamgate_error` - Error types
//! - `streamgate_core` - Media normalization, link tokens, tracing setup
//! - `streamgate_cache` - TTL cache for file descriptors
//! - `streamgate_interface` - Protocol client contracts (`ChatApi`, `PeerStore`)
//! - `streamgate_security` - Access policy and subscription gate
//! - `streamgate_bot` - Configuration, archive resolver, link pipeline, commands
//!
//! This crate (`streamgate`) re-exports everything for convenience and
//! ships the `streamgate` command-line tool.

#![forbid(unsafe_code)]

mod link;

pub use link::ParsedLink;

pub use streamgate_bot::*;
pub use streamgate_cache::*;
pub use streamgate_core::*;
pub use streamgate_error::*;
pub use streamgate_interface::*;
pub use streamgate_security::*;
