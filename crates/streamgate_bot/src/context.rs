//! Application context shared by every handler.

use crate::{ArchiveResolver, LinkService, StreamgateConfig};
use std::sync::Arc;
use streamgate_cache::{CacheConfig, TtlCache};
use streamgate_error::{ConfigError, StreamgateResult};
use streamgate_interface::{ChatApi, PeerStore};
use streamgate_security::{AccessPolicy, SubscriptionGate};
use tracing::info;

/// Everything a command handler needs, built once at start-up.
#[derive(derive_getters::Getters)]
pub struct AppContext {
    config: StreamgateConfig,
    cache: Arc<TtlCache>,
    api: Arc<dyn ChatApi>,
    peers: Arc<dyn PeerStore>,
    policy: AccessPolicy,
    gate: SubscriptionGate,
    links: LinkService,
}

impl AppContext {
    /// Build the context with a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the force-subscription channel is not a
    /// valid channel name.
    pub fn new(
        config: StreamgateConfig,
        api: Arc<dyn ChatApi>,
        peers: Arc<dyn PeerStore>,
    ) -> StreamgateResult<Self> {
        let cache = Arc::new(TtlCache::new(CacheConfig::default()));
        Self::with_cache(config, api, peers, cache)
    }

    /// Build the context around an existing cache.
    pub fn with_cache(
        config: StreamgateConfig,
        api: Arc<dyn ChatApi>,
        peers: Arc<dyn PeerStore>,
        cache: Arc<TtlCache>,
    ) -> StreamgateResult<Self> {
        let gate = SubscriptionGate::new(
            api.clone(),
            config.force_sub_channel().as_deref(),
            config.request_timeout(),
        )
        .map_err(|e| ConfigError::new(e.to_string()))?;

        let policy = AccessPolicy::new(config.allowed_users().iter().copied());
        let resolver = ArchiveResolver::new(
            api.clone(),
            peers.clone(),
            *config.archive_channel(),
            config.request_timeout(),
        );
        let links = LinkService::new(
            resolver,
            cache.clone(),
            api.clone(),
            config.base_url(),
            *config.hash_length(),
        );

        info!(
            bot_id = api.self_id(),
            base_url = %config.base_url(),
            "Application context ready"
        );
        Ok(Self {
            config,
            cache,
            api,
            peers,
            policy,
            gate,
            links,
        })
    }
}
