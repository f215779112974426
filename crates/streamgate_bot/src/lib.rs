//! Link issuance for the streamgate bot.
//!
//! This crate wires the pure pieces from `streamgate_core` to the protocol
//! client contracts in `streamgate_interface`:
//!
//! - [`StreamgateConfig`] - layered configuration (file, environment, CLI)
//! - [`ArchiveResolver`] - forwards user messages into the archive channel
//! - [`LinkService`] - issues and redeems stream links
//! - [`start_client`] - starts the protocol client under a deadline
//! - [`CommandRegistry`] - routes incoming messages to command handlers
//!
//! Everything a handler needs is carried by an [`AppContext`] shared behind
//! an `Arc`; there is no global state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod commands;
mod config;
mod context;
mod pipeline;
mod resolver;

pub use bootstrap::{DEFAULT_BOOTSTRAP_DEADLINE, start_client};
pub use commands::{
    Button, CommandHandler, CommandRegistry, IncomingMessage, LinkCommand, Reply, StartCommand,
    messages,
};
pub use config::{ConfigOverrides, StreamgateConfig, strip_channel_prefix};
pub use context::AppContext;
pub use pipeline::{DESCRIPTOR_TTL_SECS, IssuedLink, LinkService, descriptor_cache_key};
pub use resolver::{ArchiveResolver, ForwardedMessage};
