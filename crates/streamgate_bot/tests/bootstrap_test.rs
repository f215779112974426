//! Client bootstrap deadline handling.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use streamgate_bot::{DEFAULT_BOOTSTRAP_DEADLINE, start_client};
use streamgate_error::{BootstrapErrorKind, ConfigError, StreamgateErrorKind, StreamgateResult};
use streamgate_interface::ClientConnector;

/// Connector that takes `delay` to produce a client, or fails.
struct SlowConnector {
    delay: Duration,
    fail: bool,
    finished: Arc<AtomicBool>,
}

impl SlowConnector {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            fail: false,
            finished: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl ClientConnector for SlowConnector {
    type Client = &'static str;

    async fn connect(self) -> StreamgateResult<Self::Client> {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        if self.fail {
            return Err(ConfigError::new("bad credentials").into());
        }
        Ok("client")
    }
}

struct PanickingConnector;

#[async_trait]
impl ClientConnector for PanickingConnector {
    type Client = ();

    async fn connect(self) -> StreamgateResult<Self::Client> {
        panic!("connector exploded");
    }
}

#[tokio::test(start_paused = true)]
async fn test_client_ready_before_deadline() {
    let client = start_client(SlowConnector::new(Duration::from_secs(5)), DEFAULT_BOOTSTRAP_DEADLINE)
        .await
        .unwrap();
    assert_eq!(client, "client");
}

#[tokio::test(start_paused = true)]
async fn test_deadline_exceeded_aborts_client() {
    let connector = SlowConnector::new(Duration::from_secs(300));
    let finished = connector.finished.clone();

    let err = start_client(connector, Duration::from_secs(120))
        .await
        .unwrap_err();
    let StreamgateErrorKind::Bootstrap(bootstrap) = err.kind() else {
        panic!("expected bootstrap error, got {err}");
    };
    assert_eq!(
        bootstrap.kind(),
        &BootstrapErrorKind::DeadlineExceeded(Duration::from_secs(120))
    );

    // The aborted task never completes, even after its delay would have passed.
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_connector_error_propagates() {
    let mut connector = SlowConnector::new(Duration::from_secs(1));
    connector.fail = true;
    let err = start_client(connector, DEFAULT_BOOTSTRAP_DEADLINE)
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), StreamgateErrorKind::Config(_)));
}

#[tokio::test]
async fn test_panicking_connector_is_client_failure() {
    let err = start_client(PanickingConnector, DEFAULT_BOOTSTRAP_DEADLINE)
        .await
        .unwrap_err();
    let StreamgateErrorKind::Bootstrap(bootstrap) = err.kind() else {
        panic!("expected bootstrap error, got {err}");
    };
    assert!(matches!(bootstrap.kind(), BootstrapErrorKind::ClientFailed(_)));
}
