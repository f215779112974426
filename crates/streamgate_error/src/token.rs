//! Link token error types.

/// Kinds of link token errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TokenErrorKind {
    /// The token in the link does not match the descriptor it points at
    #[display("Token mismatch for message {}", stable_message_id)]
    TokenMismatch {
        /// Stable message ID the link pointed at
        stable_message_id: i32,
    },
}

/// Token error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Token Error: {} at line {} in {}", kind, line, file)]
pub struct TokenError {
    /// The kind of error that occurred
    pub kind: TokenErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TokenError {
    /// Create a new token error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TokenErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TokenErrorKind {
        &self.kind
    }
}
