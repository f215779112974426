//! Canonical file descriptor.

use serde::{Deserialize, Serialize};

/// Where the streaming server fetches the bytes of a file from.
///
/// The fields are opaque to this crate; they are exactly what the protocol
/// needs to issue ranged downloads for the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileLocation {
    /// A document download location
    Document {
        /// Document ID
        id: i64,
        /// Access hash granted to this bot
        access_hash: i64,
        /// File reference blob
        file_reference: Vec<u8>,
        /// Thumbnail size type, empty for the full document
        thumb_size: String,
    },
    /// A photo download location
    Photo {
        /// Photo ID
        id: i64,
        /// Access hash granted to this bot
        access_hash: i64,
        /// File reference blob
        file_reference: Vec<u8>,
        /// Size type of the selected photo variant
        thumb_size: String,
    },
}

/// Canonical record of a media item.
///
/// Descriptors are immutable once built: they only expose getters. The
/// `id` is the sole identity of the file and the link token is derived from
/// the descriptor, so two descriptors for the same file always produce the
/// same token.
///
/// # Examples
///
/// ```
/// use streamgate_core::{FileDescriptorBuilder, FileLocation};
///
/// let file = FileDescriptorBuilder::default()
///     .id(99)
///     .name("a.mp4")
///     .size(1_048_576u64)
///     .mime_type("video/mp4")
///     .location(FileLocation::Document {
///         id: 99,
///         access_hash: 1,
///         file_reference: vec![],
///         thumb_size: String::new(),
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(file.name(), "a.mp4");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct FileDescriptor {
    /// Protocol identity of the file
    pub(crate) id: i64,
    /// File name, empty when the protocol reports none
    pub(crate) name: String,
    /// Size in bytes, 0 when the media kind does not report a size
    pub(crate) size: u64,
    /// MIME type
    pub(crate) mime_type: String,
    /// Download location for the streaming server
    pub(crate) location: FileLocation,
}

impl FileDescriptor {
    /// Whether this descriptor was produced from a video.
    pub fn is_video(&self) -> bool {
        self.mime_type.contains("video")
    }
}
