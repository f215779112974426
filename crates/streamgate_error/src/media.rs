//! Media normalization error types.

/// Kinds of media normalization errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// The media variant cannot be turned into a file descriptor
    #[display("Unsupported media kind: {}", _0)]
    UnsupportedMediaKind(String),
}

/// Media error with location tracking.
///
/// # Examples
///
/// ```
/// use streamgate_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::UnsupportedMediaKind("poll".to_string()));
/// assert!(format!("{}", err).contains("poll"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new media error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an [`MediaErrorKind::UnsupportedMediaKind`] error.
    #[track_caller]
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::new(MediaErrorKind::UnsupportedMediaKind(detail.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MediaErrorKind {
        &self.kind
    }
}
