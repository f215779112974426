//! Security error types.

/// Specific security error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SecurityErrorKind {
    /// The sender is not on the allow-list
    #[display("User {} is not allowed: {}", user_id, reason)]
    PermissionDenied {
        /// User that was denied
        user_id: i64,
        /// Reason for denial
        reason: String,
    },

    /// The message did not come from a private chat with a user
    #[display("Chat {} is not a private chat", _0)]
    NotPrivateChat(i64),

    /// The force-subscription channel does not exist
    #[display("Channel '{}' not found", _0)]
    ChannelNotFound(String),

    /// The force-subscription channel could not be resolved
    #[display("Failed to resolve channel '{}': {}", channel, reason)]
    ChannelResolution {
        /// Channel username
        channel: String,
        /// Upstream failure
        reason: String,
    },

    /// Configuration error
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Security error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The specific error kind
    pub kind: SecurityErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new security error with location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SecurityErrorKind {
        &self.kind
    }
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
