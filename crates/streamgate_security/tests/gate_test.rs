//! Subscription gate behaviour against a scripted chat API.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use streamgate_interface::{
    ArchivedMessage, ChatApi, ForwardRequest, InputChannel, InputPeer, ResolvedChat, RpcError,
    UpdateRecord,
};
use streamgate_security::{DenyReason, GateDecision, SecurityErrorKind, SubscriptionGate};

/// Chat API whose username and participant answers are scripted.
struct ScriptedApi {
    resolve: Result<Vec<ResolvedChat>, RpcError>,
    participant: Result<(), RpcError>,
    participant_delay: Option<Duration>,
    participant_calls: Mutex<Vec<(InputChannel, InputPeer)>>,
}

impl ScriptedApi {
    fn member() -> Self {
        Self {
            resolve: Ok(vec![ResolvedChat::Channel {
                id: 500,
                access_hash: 9,
                title: "News".to_string(),
                username: Some("news_feed".to_string()),
            }]),
            participant: Ok(()),
            participant_delay: None,
            participant_calls: Mutex::new(Vec::new()),
        }
    }

    fn with_participant(mut self, result: Result<(), RpcError>) -> Self {
        self.participant = result;
        self
    }
}

#[async_trait]
impl ChatApi for ScriptedApi {
    fn self_id(&self) -> i64 {
        1
    }

    async fn get_channels(&self, _channels: &[InputChannel]) -> Result<Vec<ResolvedChat>, RpcError> {
        Ok(Vec::new())
    }

    async fn resolve_username(&self, _username: &str) -> Result<Vec<ResolvedChat>, RpcError> {
        self.resolve.clone()
    }

    async fn get_channel_participant(
        &self,
        channel: InputChannel,
        participant: InputPeer,
    ) -> Result<(), RpcError> {
        self.participant_calls.lock().push((channel, participant));
        if let Some(delay) = self.participant_delay {
            tokio::time::sleep(delay).await;
        }
        self.participant.clone()
    }

    async fn forward_messages(&self, _request: ForwardRequest) -> Result<Vec<UpdateRecord>, RpcError> {
        Ok(Vec::new())
    }

    async fn get_channel_messages(
        &self,
        _channel: InputChannel,
        _ids: &[i32],
    ) -> Result<Vec<ArchivedMessage>, RpcError> {
        Ok(Vec::new())
    }
}

fn gate(api: ScriptedApi, channel: Option<&str>) -> (Arc<ScriptedApi>, SubscriptionGate) {
    let api = Arc::new(api);
    let gate = SubscriptionGate::new(api.clone(), channel, Duration::from_secs(5)).unwrap();
    (api, gate)
}

#[tokio::test]
async fn test_no_channel_allows() {
    let (api, gate) = gate(
        ScriptedApi::member().with_participant(Err(RpcError::new(400, "USER_NOT_PARTICIPANT"))),
        None,
    );
    assert_eq!(gate.check(7).await.unwrap(), GateDecision::Allow);
    assert!(api.participant_calls.lock().is_empty());
}

#[tokio::test]
async fn test_member_allowed() {
    let (api, gate) = gate(ScriptedApi::member(), Some("@news_feed"));
    assert_eq!(gate.check(7).await.unwrap(), GateDecision::Allow);

    let calls = api.participant_calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].0,
        InputChannel {
            channel_id: 500,
            access_hash: 9
        }
    );
    assert_eq!(
        calls[0].1,
        InputPeer::User {
            user_id: 7,
            access_hash: 0
        }
    );
}

#[tokio::test]
async fn test_not_participant_denied_without_error() {
    for error_type in [
        "USER_NOT_PARTICIPANT",
        "PARTICIPANT_NOT_EXIST",
        "CHANNEL_PRIVATE",
        "CHANNEL_INVALID",
        "USER_CHANNEL_INVALID",
    ] {
        let (_, gate) = gate(
            ScriptedApi::member().with_participant(Err(RpcError::new(400, error_type))),
            Some("news_feed"),
        );
        assert_eq!(
            gate.check(7).await.unwrap(),
            GateDecision::Deny(DenyReason::NotSubscribed),
            "{error_type}"
        );
    }
}

#[tokio::test]
async fn test_unknown_error_denied_as_indeterminate() {
    let (_, gate) = gate(
        ScriptedApi::member().with_participant(Err(RpcError::new(500, "INTERNAL_SERVER_ERROR"))),
        Some("news_feed"),
    );
    let decision = gate.check(7).await.unwrap();
    assert_eq!(decision, GateDecision::Deny(DenyReason::Indeterminate));
    assert!(!decision.is_allowed());
}

#[tokio::test(start_paused = true)]
async fn test_slow_participant_check_denied() {
    let mut api = ScriptedApi::member();
    api.participant_delay = Some(Duration::from_secs(60));
    let (_, gate) = gate(api, Some("news_feed"));
    assert_eq!(
        gate.check(7).await.unwrap(),
        GateDecision::Deny(DenyReason::Indeterminate)
    );
}

#[tokio::test]
async fn test_missing_channel_is_error() {
    let mut api = ScriptedApi::member();
    api.resolve = Ok(vec![ResolvedChat::Chat {
        id: 3,
        title: "group".to_string(),
    }]);
    let (_, gate) = gate(api, Some("news_feed"));
    let err = gate.check(7).await.unwrap_err();
    assert_eq!(
        err.kind,
        SecurityErrorKind::ChannelNotFound("news_feed".to_string())
    );
}

#[tokio::test]
async fn test_resolution_failure_is_error() {
    let mut api = ScriptedApi::member();
    api.resolve = Err(RpcError::new(420, "FLOOD_WAIT_30"));
    let (_, gate) = gate(api, Some("news_feed"));
    let err = gate.check(7).await.unwrap_err();
    assert!(matches!(err.kind, SecurityErrorKind::ChannelResolution { .. }));
}

#[test]
fn test_join_url() {
    let (_, gate) = gate(ScriptedApi::member(), Some("https://t.me/news_feed"));
    assert_eq!(gate.channel(), Some("news_feed"));
    assert_eq!(gate.join_url().as_deref(), Some("https://t.me/news_feed"));
}
