//! Archive channel error types.
//!
//! Covers peer resolution for the archive channel, forwarding source messages
//! into it, and reading archived messages back at redemption time.

/// Specific archive error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ArchiveErrorKind {
    /// The source chat is not present in the peer store
    #[display("Chat {} is not a known peer", _0)]
    UnknownSourcePeer(i64),

    /// The archive channel could not be resolved to an addressable peer
    #[display("Failed to resolve archive channel: {}", _0)]
    PeerResolutionFailed(String),

    /// The forward acknowledgment did not have the expected shape
    #[display("Malformed forward acknowledgment: {}", _0)]
    MalformedForwardAck(String),

    /// The archived message was deleted or never existed
    #[display("Archived message {} is gone", _0)]
    MessageGone(i32),

    /// The upstream protocol call returned an error
    #[display("Upstream call '{}' failed: {}", call, reason)]
    Upstream {
        /// Name of the upstream call
        call: String,
        /// Error reported by the upstream
        reason: String,
    },

    /// The upstream protocol call did not finish in time
    #[display("Upstream call '{}' timed out after {}ms", call, timeout_ms)]
    UpstreamTimeout {
        /// Name of the upstream call
        call: String,
        /// Timeout that elapsed
        timeout_ms: u64,
    },
}

/// Archive error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Archive Error: {} at line {} in {}", kind, line, file)]
pub struct ArchiveError {
    /// The kind of error that occurred
    pub kind: ArchiveErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ArchiveError {
    /// Create a new archive error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamgate_error::{ArchiveError, ArchiveErrorKind};
    ///
    /// let err = ArchiveError::new(ArchiveErrorKind::UnknownSourcePeer(100));
    /// assert!(format!("{}", err).contains("100"));
    /// ```
    #[track_caller]
    pub fn new(kind: ArchiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ArchiveErrorKind {
        &self.kind
    }
}
