//! Shared test doubles for the protocol client.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use streamgate_bot::{AppContext, ConfigOverrides, StreamgateConfig};
use streamgate_core::{Document, DocumentAttribute, MessageMedia};
use streamgate_interface::{
    ArchivedMessage, ChannelMessage, ChatApi, ForwardRequest, InputChannel, InputPeer,
    MemoryPeerStore, PeerKind, PeerRecord, PeerStore, ResolvedChat, RpcError, UpdateRecord,
};

pub const BOT_ID: i64 = 4242;
pub const USER_ID: i64 = 100;

/// How the mock answers a forward.
#[derive(Debug, Clone)]
pub enum ForwardMode {
    /// Acknowledge with `stable_id`, echoing the request's correlation ID
    Echo { stable_id: i32, media: Option<MessageMedia> },
    /// Return exactly these updates
    Fixed(Vec<UpdateRecord>),
    /// Fail the RPC
    Fail(RpcError),
    /// Never answer
    Hang,
}

/// Scriptable chat API that records the calls it receives.
pub struct MockChat {
    pub channels: Mutex<Vec<ResolvedChat>>,
    pub forward_mode: Mutex<ForwardMode>,
    pub archived: Mutex<HashMap<i32, ArchivedMessage>>,
    pub participant: Mutex<Result<(), RpcError>>,
    pub forwards: Mutex<Vec<ForwardRequest>>,
    pub get_channels_calls: Mutex<usize>,
    pub get_messages_calls: Mutex<usize>,
}

impl MockChat {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(Vec::new()),
            forward_mode: Mutex::new(ForwardMode::Fixed(Vec::new())),
            archived: Mutex::new(HashMap::new()),
            participant: Mutex::new(Ok(())),
            forwards: Mutex::new(Vec::new()),
            get_channels_calls: Mutex::new(0),
            get_messages_calls: Mutex::new(0),
        }
    }

    pub fn echo(stable_id: i32, media: MessageMedia) -> Self {
        let mock = Self::new();
        *mock.forward_mode.lock() = ForwardMode::Echo {
            stable_id,
            media: Some(media),
        };
        mock
    }
}

#[async_trait]
impl ChatApi for MockChat {
    fn self_id(&self) -> i64 {
        BOT_ID
    }

    async fn get_channels(&self, _channels: &[InputChannel]) -> Result<Vec<ResolvedChat>, RpcError> {
        *self.get_channels_calls.lock() += 1;
        Ok(self.channels.lock().clone())
    }

    async fn resolve_username(&self, username: &str) -> Result<Vec<ResolvedChat>, RpcError> {
        Ok(vec![ResolvedChat::Channel {
            id: 900,
            access_hash: 9,
            title: "Updates".to_string(),
            username: Some(username.to_string()),
        }])
    }

    async fn get_channel_participant(
        &self,
        _channel: InputChannel,
        _participant: InputPeer,
    ) -> Result<(), RpcError> {
        self.participant.lock().clone()
    }

    async fn forward_messages(&self, request: ForwardRequest) -> Result<Vec<UpdateRecord>, RpcError> {
        let random_id = request.random_ids.first().copied().unwrap_or_default();
        self.forwards.lock().push(request);
        let mode = self.forward_mode.lock().clone();
        match mode {
            ForwardMode::Echo { stable_id, media } => Ok(vec![
                UpdateRecord::MessageId {
                    id: stable_id,
                    random_id,
                },
                UpdateRecord::NewChannelMessage(ChannelMessage {
                    id: stable_id,
                    media,
                }),
            ]),
            ForwardMode::Fixed(updates) => Ok(updates),
            ForwardMode::Fail(err) => Err(err),
            ForwardMode::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn get_channel_messages(
        &self,
        _channel: InputChannel,
        ids: &[i32],
    ) -> Result<Vec<ArchivedMessage>, RpcError> {
        *self.get_messages_calls.lock() += 1;
        let archived = self.archived.lock();
        Ok(ids
            .iter()
            .map(|id| {
                archived
                    .get(id)
                    .cloned()
                    .unwrap_or(ArchivedMessage::Empty { id: *id })
            })
            .collect())
    }
}

/// The document from the end-to-end scenario.
pub fn video_document() -> MessageMedia {
    MessageMedia::Document(Some(Document {
        id: 99,
        access_hash: 1,
        file_reference: vec![1, 2, 3],
        size: 1_048_576,
        mime_type: "video/mp4".to_string(),
        attributes: vec![DocumentAttribute::Filename {
            file_name: "a.mp4".to_string(),
        }],
    }))
}

pub fn user_peer(id: i64) -> PeerRecord {
    PeerRecord {
        id,
        access_hash: 11,
        kind: PeerKind::User,
        username: None,
    }
}

pub fn channel_peer(id: i64) -> PeerRecord {
    PeerRecord {
        id,
        access_hash: 22,
        kind: PeerKind::Channel,
        username: None,
    }
}

/// Configuration for archive channel -1001 served at `http://host:8080`.
pub fn test_config(overrides: ConfigOverrides) -> StreamgateConfig {
    let overrides = ConfigOverrides {
        archive_channel: overrides.archive_channel.or(Some(-1001)),
        host: overrides.host.or(Some("http://host:8080".to_string())),
        ..overrides
    };
    StreamgateConfig::load_with_env(None, Some(HashMap::new()), &overrides).unwrap()
}

/// Peer store knowing the test user and the archive channel.
pub fn known_peers(config: &StreamgateConfig) -> Arc<MemoryPeerStore> {
    let peers = Arc::new(MemoryPeerStore::new());
    peers.add_peer(user_peer(USER_ID));
    peers.add_peer(channel_peer(*config.archive_channel()));
    peers
}

pub fn context(
    config: StreamgateConfig,
    api: Arc<MockChat>,
    peers: Arc<MemoryPeerStore>,
) -> AppContext {
    AppContext::new(config, api, peers).unwrap()
}
