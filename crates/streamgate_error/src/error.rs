//! Top-level error wrapper types.

use crate::{ArchiveError, BootstrapError, ConfigError, JsonError, MediaError, TokenError};

/// Every failure a pipeline stage can hand to the command layer.
///
/// # Examples
///
/// ```
/// use streamgate_error::{StreamgateError, ConfigError};
///
/// let err: StreamgateError = ConfigError::new("archive_channel is required").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StreamgateErrorKind {
    /// Media could not be normalized into a file descriptor
    #[from(MediaError)]
    Media(MediaError),
    /// Archive channel resolution or forwarding failed
    #[from(ArchiveError)]
    Archive(ArchiveError),
    /// Link token did not match the descriptor
    #[from(TokenError)]
    Token(TokenError),
    /// Client bootstrap failed
    #[from(BootstrapError)]
    Bootstrap(BootstrapError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Streamgate error with kind discrimination.
///
/// The kind is boxed so the error stays one pointer wide on the happy path.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Streamgate Error: {}", _0)]
pub struct StreamgateError(Box<StreamgateErrorKind>);

impl StreamgateError {
    /// Create a new error from a kind.
    pub fn new(kind: StreamgateErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StreamgateErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StreamgateErrorKind
impl<T> From<T> for StreamgateError
where
    T: Into<StreamgateErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for streamgate operations.
pub type StreamgateResult<T> = std::result::Result<T, StreamgateError>;
