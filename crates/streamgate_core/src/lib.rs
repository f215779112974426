//! Core data types for the streamgate link-issuance pipeline.
//!
//! This crate owns the pure parts of the pipeline:
//! - the protocol media union and its normalization into a [`FileDescriptor`]
//! - the durable archive reference produced by forwarding
//! - the link token codec that binds an issued link to a descriptor
//! - tracing subscriber setup shared by every binary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod file;
mod media;
mod reference;
mod telemetry;
mod token;

pub use file::{FileDescriptor, FileDescriptorBuilder, FileLocation};
pub use media::{
    Document, DocumentAttribute, MessageMedia, Photo, PhotoSize, file_from_media,
    is_supported_media,
};
pub use reference::DurableMessageReference;
pub use telemetry::init_tracing;
pub use token::{FullHash, HashLength, LinkToken, ShortHash, pack, shorten, verify_token};
