//! Link token codec.
//!
//! A link carries a short prefix of a SHA-256 digest over the descriptor's
//! name, size, MIME type and identity. The streaming server recomputes the
//! digest from the descriptor it loads for the stable message ID and rejects
//! the request when the prefixes differ.
//!
//! Every field is length-prefixed before hashing so that moving bytes from
//! one field into its neighbour changes the digest.

use crate::FileDescriptor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use streamgate_error::{TokenError, TokenErrorKind};

/// Number of hex characters of the full hash placed in issued links.
///
/// Shorter tokens make shorter links and are easier to guess; the length is
/// a configuration knob, clamped once when the configuration is loaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(from = "i64", into = "i64")]
pub struct HashLength(usize);

impl HashLength {
    /// Length used when none is configured.
    pub const DEFAULT: HashLength = HashLength(6);
    /// Shortest accepted length.
    pub const MIN: usize = 5;
    /// Longest accepted length.
    pub const MAX: usize = 32;

    /// Apply the configuration policy to a raw length.
    ///
    /// - `0` means "unset" and becomes 6
    /// - anything above 32 becomes 32
    /// - anything below 5 becomes 6
    ///
    /// # Examples
    ///
    /// ```
    /// use streamgate_core::HashLength;
    ///
    /// assert_eq!(HashLength::clamped(0).get(), 6);
    /// assert_eq!(HashLength::clamped(3).get(), 6);
    /// assert_eq!(HashLength::clamped(5).get(), 5);
    /// assert_eq!(HashLength::clamped(64).get(), 32);
    /// ```
    pub fn clamped(raw: i64) -> Self {
        if raw == 0 {
            tracing::info!("Hash length can't be 0, defaulting to {}", Self::DEFAULT);
            return Self::DEFAULT;
        }
        if raw > Self::MAX as i64 {
            tracing::info!(raw, "Hash length can't be more than {}, using {}", Self::MAX, Self::MAX);
            return Self(Self::MAX);
        }
        if raw < Self::MIN as i64 {
            tracing::info!(raw, "Hash length can't be less than {}, defaulting to {}", Self::MIN, Self::DEFAULT);
            return Self::DEFAULT;
        }
        Self(raw as usize)
    }

    /// The length in characters.
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for HashLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for HashLength {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<HashLength> for i64 {
    fn from(length: HashLength) -> Self {
        length.0 as i64
    }
}

/// Hex-encoded SHA-256 digest binding a link to a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct FullHash(String);

impl FullHash {
    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Prefix of a [`FullHash`] embedded in issued links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub struct ShortHash(String);

impl ShortHash {
    /// The hex prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Deterministically digest the fields that identify a file.
///
/// The encoding is order sensitive: swapping, moving or changing any field
/// changes the output.
pub fn pack(name: &str, size: u64, mime_type: &str, id: i64) -> FullHash {
    let mut hasher = Sha256::new();
    write_field(&mut hasher, name.as_bytes());
    write_field(&mut hasher, &size.to_be_bytes());
    write_field(&mut hasher, mime_type.as_bytes());
    write_field(&mut hasher, &id.to_be_bytes());
    FullHash(format!("{:x}", hasher.finalize()))
}

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Take the first `length` hex characters of a full hash.
pub fn shorten(full: &FullHash, length: HashLength) -> ShortHash {
    // The digest is 64 ASCII hex characters and length is at most 32.
    ShortHash(full.0[..length.get()].to_string())
}

/// Token issued for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct LinkToken {
    full: FullHash,
    short: ShortHash,
}

impl LinkToken {
    /// Compute the token for a descriptor.
    pub fn for_file(file: &FileDescriptor, length: HashLength) -> Self {
        let full = pack(file.name(), *file.size(), file.mime_type(), *file.id());
        let short = shorten(&full, length);
        Self { full, short }
    }
}

/// Check the token from a link against the descriptor it points at.
///
/// # Errors
///
/// Returns `TokenMismatch` when the token was forged, truncated or the
/// descriptor behind the stable message ID changed.
pub fn verify_token(
    stable_message_id: i32,
    file: &FileDescriptor,
    token: &str,
    length: HashLength,
) -> Result<(), TokenError> {
    let expected = LinkToken::for_file(file, length);
    if expected.short().as_str() != token {
        tracing::warn!(stable_message_id, "Link token does not match descriptor");
        return Err(TokenError::new(TokenErrorKind::TokenMismatch { stable_message_id }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_is_deterministic() {
        let a = pack("a.mp4", 1_048_576, "video/mp4", 99);
        let b = pack("a.mp4", 1_048_576, "video/mp4", 99);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_pack_separates_adjacent_fields() {
        let a = pack("ab", 1, "c", 1);
        let b = pack("a", 1, "bc", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_shorten_lengths() {
        let full = pack("a.mp4", 1, "video/mp4", 99);
        for n in HashLength::MIN..=HashLength::MAX {
            let short = shorten(&full, HashLength::clamped(n as i64));
            assert_eq!(short.as_str().len(), n);
            assert!(full.as_str().starts_with(short.as_str()));
        }
    }

    #[test]
    fn test_clamp_policy() {
        assert_eq!(HashLength::clamped(0), HashLength::DEFAULT);
        assert_eq!(HashLength::clamped(-4).get(), 6);
        assert_eq!(HashLength::clamped(4).get(), 6);
        assert_eq!(HashLength::clamped(5).get(), 5);
        assert_eq!(HashLength::clamped(32).get(), 32);
        assert_eq!(HashLength::clamped(33).get(), 32);
    }

    #[test]
    fn test_hash_length_deserializes_clamped() {
        let length: HashLength = serde_json::from_str("100").unwrap();
        assert_eq!(length.get(), 32);
    }
}
