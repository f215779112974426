//! Upstream RPC errors.

/// Error returned by the protocol for a single RPC.
///
/// `message` carries the protocol's error type, for example
/// `USER_NOT_PARTICIPANT` or `CHANNEL_PRIVATE`. Transport failures that
/// never reached the server use code 0.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("RPC error {}: {}", code, message)]
pub struct RpcError {
    /// Numeric error code
    pub code: i32,
    /// Error type reported by the server
    pub message: String,
}

impl RpcError {
    /// Create a new RPC error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the server reported exactly this error type.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamgate_interface::RpcError;
    ///
    /// let err = RpcError::new(400, "CHANNEL_PRIVATE");
    /// assert!(err.is("CHANNEL_PRIVATE"));
    /// assert!(!err.is("CHANNEL_INVALID"));
    /// ```
    pub fn is(&self, error_type: &str) -> bool {
        self.message == error_type
    }
}
