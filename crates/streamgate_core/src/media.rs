//! Protocol media union and its normalization into a file descriptor.

use crate::{FileDescriptor, FileLocation};
use serde::{Deserialize, Serialize};
use streamgate_error::MediaError;
use tracing::instrument;

/// Photo MIME type reported for every normalized photo.
const PHOTO_MIME_TYPE: &str = "image/jpeg";

/// Media attached to a chat message.
///
/// `Document(None)` and `Photo(None)` are the protocol's empty placeholder
/// payloads (for example a photo that was deleted). Every other media kind
/// is carried as `Other` with the protocol's name for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum MessageMedia {
    /// A document (file, video, audio, animation, sticker)
    Document(Option<Document>),
    /// A photo
    Photo(Option<Photo>),
    /// Any other media kind (geo point, contact, poll, web page, ...)
    Other(String),
}

impl MessageMedia {
    /// Short name of the media kind, used in logs and errors.
    pub fn kind_name(&self) -> &str {
        match self {
            MessageMedia::Document(Some(_)) => "document",
            MessageMedia::Document(None) => "document_empty",
            MessageMedia::Photo(Some(_)) => "photo",
            MessageMedia::Photo(None) => "photo_empty",
            MessageMedia::Other(kind) => kind,
        }
    }
}

/// A document as reported by the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID
    pub id: i64,
    /// Access hash
    pub access_hash: i64,
    /// File reference blob
    pub file_reference: Vec<u8>,
    /// Size in bytes
    pub size: i64,
    /// MIME type
    pub mime_type: String,
    /// Document attributes
    #[serde(default)]
    pub attributes: Vec<DocumentAttribute>,
}

/// Attribute attached to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentAttribute {
    /// Original file name
    Filename {
        /// The file name
        file_name: String,
    },
    /// Video metadata
    Video {
        /// Duration in seconds
        duration: i32,
        /// Width in pixels
        w: i32,
        /// Height in pixels
        h: i32,
    },
    /// Audio metadata
    Audio {
        /// Duration in seconds
        duration: i32,
        /// Track title
        title: Option<String>,
    },
    /// Any other attribute
    Other {
        /// Protocol name of the attribute
        name: String,
    },
}

/// A photo as reported by the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Photo ID
    pub id: i64,
    /// Access hash
    pub access_hash: i64,
    /// File reference blob
    pub file_reference: Vec<u8>,
    /// Available size variants, in protocol order
    pub sizes: Vec<PhotoSize>,
}

/// One size variant of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum PhotoSize {
    /// Placeholder for a size that is not available
    Empty {
        /// Size type
        kind: String,
    },
    /// A downloadable size
    Sized {
        /// Size type
        kind: String,
        /// Width
        w: i32,
        /// Height
        h: i32,
        /// Size in bytes
        size: i64,
    },
    /// A progressive JPEG with several scan sizes
    Progressive {
        /// Size type
        kind: String,
        /// Width
        w: i32,
        /// Height
        h: i32,
        /// Byte sizes of the progressive scans
        sizes: Vec<i64>,
    },
    /// A size whose bytes are inlined in the message
    Cached {
        /// Size type
        kind: String,
        /// Width
        w: i32,
        /// Height
        h: i32,
        /// Inline bytes
        bytes: Vec<u8>,
    },
    /// A tiny inline preview
    Stripped {
        /// Size type
        kind: String,
        /// Inline bytes
        bytes: Vec<u8>,
    },
}

impl PhotoSize {
    /// Size type of this variant.
    pub fn kind(&self) -> &str {
        match self {
            PhotoSize::Empty { kind }
            | PhotoSize::Sized { kind, .. }
            | PhotoSize::Progressive { kind, .. }
            | PhotoSize::Cached { kind, .. }
            | PhotoSize::Stripped { kind, .. } => kind,
        }
    }

    /// Whether this is the empty placeholder variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, PhotoSize::Empty { .. })
    }
}

/// Whether a message carries media the pipeline can issue links for.
///
/// This is a cheap pre-check used before forwarding; the placeholder
/// payloads are still rejected later by [`file_from_media`].
pub fn is_supported_media(media: &MessageMedia) -> bool {
    matches!(media, MessageMedia::Document(_) | MessageMedia::Photo(_))
}

/// Normalize protocol media into a [`FileDescriptor`].
///
/// - Documents keep their size and MIME type; the name comes from the first
///   filename attribute and is empty when there is none.
/// - Photos use the **last** size variant in the order the protocol sent
///   them. The name is `photo_<id>.jpg`, the size is reported as 0 and the
///   MIME type is `image/jpeg`. Callers must treat size 0 on a photo as
///   "unknown", not "empty".
///
/// # Errors
///
/// Returns `UnsupportedMediaKind` for any other media kind, for empty
/// placeholder payloads, and for photos without a usable size variant.
///
/// # Examples
///
/// ```
/// use streamgate_core::{MessageMedia, file_from_media};
///
/// let result = file_from_media(&MessageMedia::Other("geo".to_string()));
/// assert!(result.is_err());
/// ```
#[instrument(level = "debug", skip(media), fields(kind = media.kind_name()))]
pub fn file_from_media(media: &MessageMedia) -> Result<FileDescriptor, MediaError> {
    match media {
        MessageMedia::Document(Some(document)) => Ok(file_from_document(document)),
        MessageMedia::Photo(Some(photo)) => file_from_photo(photo),
        other => Err(MediaError::unsupported(other.kind_name())),
    }
}

fn file_from_document(document: &Document) -> FileDescriptor {
    let name = document
        .attributes
        .iter()
        .find_map(|attribute| match attribute {
            DocumentAttribute::Filename { file_name } => Some(file_name.clone()),
            _ => None,
        })
        .unwrap_or_default();

    FileDescriptor {
        id: document.id,
        name,
        // Negative sizes never come from a well-formed peer.
        size: u64::try_from(document.size).unwrap_or(0),
        mime_type: document.mime_type.clone(),
        location: FileLocation::Document {
            id: document.id,
            access_hash: document.access_hash,
            file_reference: document.file_reference.clone(),
            thumb_size: String::new(),
        },
    }
}

fn file_from_photo(photo: &Photo) -> Result<FileDescriptor, MediaError> {
    let size = photo
        .sizes
        .last()
        .ok_or_else(|| MediaError::unsupported("photo has no sizes"))?;
    if size.is_empty() {
        return Err(MediaError::unsupported("photo size is empty"));
    }

    Ok(FileDescriptor {
        id: photo.id,
        name: format!("photo_{}.jpg", photo.id),
        size: 0,
        mime_type: PHOTO_MIME_TYPE.to_string(),
        location: FileLocation::Photo {
            id: photo.id,
            access_hash: photo.access_hash,
            file_reference: photo.file_reference.clone(),
            thumb_size: size.kind().to_string(),
        },
    })
}
