//! Client bootstrap error types.

use std::time::Duration;

/// Kinds of bootstrap errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BootstrapErrorKind {
    /// The client did not start before the deadline
    #[display("Client did not start within {:?}", _0)]
    DeadlineExceeded(Duration),

    /// The client failed to start
    #[display("Client failed to start: {}", _0)]
    ClientFailed(String),
}

/// Bootstrap error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Bootstrap Error: {} at line {} in {}", kind, line, file)]
pub struct BootstrapError {
    /// The kind of error that occurred
    pub kind: BootstrapErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BootstrapError {
    /// Create a new bootstrap error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BootstrapErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BootstrapErrorKind {
        &self.kind
    }
}
