//! Error types for the streamgate workspace.
//!
//! This crate provides the foundation error types used by every stage of the
//! link-issuance pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use streamgate_error::{MediaError, MediaErrorKind, StreamgateResult};
//!
//! fn normalize() -> StreamgateResult<()> {
//!     Err(MediaError::new(MediaErrorKind::UnsupportedMediaKind("geo".into())))?
//! }
//!
//! assert!(normalize().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod bootstrap;
mod config;
mod error;
mod json;
mod media;
mod token;

pub use archive::{ArchiveError, ArchiveErrorKind};
pub use bootstrap::{BootstrapError, BootstrapErrorKind};
pub use config::ConfigError;
pub use error::{StreamgateError, StreamgateErrorKind, StreamgateResult};
pub use json::JsonError;
pub use media::{MediaError, MediaErrorKind};
pub use token::{TokenError, TokenErrorKind};
