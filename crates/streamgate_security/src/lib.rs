//! Access control for link issuance.
//!
//! Two layers run before any media is forwarded:
//!
//! 1. **Access policy** - the sender must be a user in a private chat and,
//!    when an allow-list is configured, must be on it
//! 2. **Subscription gate** - when a force-subscription channel is
//!    configured, the user must be a participant of that channel
//!
//! The gate never admits a user on an indeterminate upstream answer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod gate;
mod policy;

pub use error::{SecurityError, SecurityErrorKind, SecurityResult};
pub use gate::{DenyReason, GateDecision, SubscriptionGate, normalize_channel};
pub use policy::AccessPolicy;
