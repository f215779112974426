//! Link issuance and redemption.

use crate::ArchiveResolver;
use std::sync::Arc;
use streamgate_cache::TtlCache;
use streamgate_core::{
    DurableMessageReference, FileDescriptor, HashLength, LinkToken, MessageMedia, file_from_media,
    verify_token,
};
use streamgate_error::{MediaError, StreamgateResult};
use streamgate_interface::ChatApi;
use tracing::{debug, info, instrument};

/// Seconds a descriptor stays in the cache.
pub const DESCRIPTOR_TTL_SECS: u64 = 3600;

/// Cache key for the descriptor of an archived message.
///
/// The bot ID is part of the key because access hashes inside the
/// descriptor's location are only valid for the bot that fetched them.
pub fn descriptor_cache_key(stable_message_id: i32, bot_id: i64) -> String {
    format!("file:{}:{}", stable_message_id, bot_id)
}

/// A link handed to the user.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct IssuedLink {
    url: String,
    download_url: String,
    descriptor: FileDescriptor,
    reference: DurableMessageReference,
    token: LinkToken,
}

/// Issues links for user messages and redeems them for descriptors.
pub struct LinkService {
    resolver: ArchiveResolver,
    cache: Arc<TtlCache>,
    api: Arc<dyn ChatApi>,
    base_url: String,
    hash_length: HashLength,
}

impl LinkService {
    /// Create a service issuing links under `base_url`.
    pub fn new(
        resolver: ArchiveResolver,
        cache: Arc<TtlCache>,
        api: Arc<dyn ChatApi>,
        base_url: impl Into<String>,
        hash_length: HashLength,
    ) -> Self {
        Self {
            resolver,
            cache,
            api,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            hash_length,
        }
    }

    /// The archive resolver.
    pub fn resolver(&self) -> &ArchiveResolver {
        &self.resolver
    }

    /// Hash length used for new links.
    pub fn hash_length(&self) -> HashLength {
        self.hash_length
    }

    /// Archive a user's message and issue a link to its file.
    ///
    /// # Errors
    ///
    /// Returns archive errors from forwarding and `UnsupportedMediaKind`
    /// when the archived copy carries no usable media.
    #[instrument(skip(self))]
    pub async fn issue_link(
        &self,
        source_chat_id: i64,
        source_message_id: i32,
    ) -> StreamgateResult<IssuedLink> {
        let (reference, media) = self
            .resolver
            .forward(source_chat_id, source_message_id)
            .await?
            .into_parts();
        let descriptor = descriptor_for(media.as_ref())?;
        let stable_message_id = *reference.stable_message_id();

        let key = descriptor_cache_key(stable_message_id, self.api.self_id());
        self.cache.set(&key, &descriptor, DESCRIPTOR_TTL_SECS)?;

        let token = LinkToken::for_file(&descriptor, self.hash_length);
        let url = format!(
            "{}/stream/{}?hash={}",
            self.base_url,
            stable_message_id,
            token.short()
        );
        let download_url = format!("{}&d=true", url);

        info!(stable_message_id, file_id = *descriptor.id(), "Issued link");
        Ok(IssuedLink {
            url,
            download_url,
            descriptor,
            reference,
            token,
        })
    }

    /// Descriptor of an archived message, from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `MessageGone` when the archived copy was deleted.
    #[instrument(skip(self))]
    pub async fn file_for_message(&self, stable_message_id: i32) -> StreamgateResult<FileDescriptor> {
        let key = descriptor_cache_key(stable_message_id, self.api.self_id());
        if let Some(descriptor) = self.cache.get::<FileDescriptor>(&key) {
            debug!("Using cached file descriptor");
            return Ok(descriptor);
        }

        debug!("Fetching file descriptor from archive");
        let message = self.resolver.fetch_archived(stable_message_id).await?;
        let descriptor = descriptor_for(message.media.as_ref())?;
        self.cache.set(&key, &descriptor, DESCRIPTOR_TTL_SECS)?;
        Ok(descriptor)
    }

    /// Check a link's hash and return the descriptor it grants access to.
    ///
    /// # Errors
    ///
    /// Returns `TokenMismatch` for a wrong hash, plus every error of
    /// [`LinkService::file_for_message`].
    #[instrument(skip(self, hash))]
    pub async fn redeem(&self, stable_message_id: i32, hash: &str) -> StreamgateResult<FileDescriptor> {
        let descriptor = self.file_for_message(stable_message_id).await?;
        verify_token(stable_message_id, &descriptor, hash, self.hash_length)?;
        Ok(descriptor)
    }
}

fn descriptor_for(media: Option<&MessageMedia>) -> Result<FileDescriptor, MediaError> {
    match media {
        Some(media) => file_from_media(media),
        None => Err(MediaError::unsupported("message has no media")),
    }
}
