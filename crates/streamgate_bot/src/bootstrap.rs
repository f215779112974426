//! Protocol client start-up.

use std::time::Duration;
use streamgate_error::{BootstrapError, BootstrapErrorKind, StreamgateResult};
use streamgate_interface::ClientConnector;
use tracing::{error, info, instrument};

/// How long the client may take to connect and authenticate.
pub const DEFAULT_BOOTSTRAP_DEADLINE: Duration = Duration::from_secs(120);

/// Start the protocol client, giving up after `deadline`.
///
/// The connector runs on its own task. When the deadline passes first the
/// task is aborted, so a hung connection attempt does not outlive the call.
///
/// # Errors
///
/// - `DeadlineExceeded` when the client did not start in time
/// - `ClientFailed` when the start-up task panicked
/// - whatever the connector itself returned
#[instrument(skip(connector))]
pub async fn start_client<C>(connector: C, deadline: Duration) -> StreamgateResult<C::Client>
where
    C: ClientConnector,
{
    info!("Starting protocol client");
    let mut handle = tokio::spawn(connector.connect());

    tokio::select! {
        joined = &mut handle => match joined {
            Ok(Ok(client)) => {
                info!("Protocol client started");
                Ok(client)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Protocol client failed to start");
                Err(e)
            }
            Err(e) => {
                error!(error = %e, "Protocol client task did not complete");
                Err(BootstrapError::new(BootstrapErrorKind::ClientFailed(e.to_string())).into())
            }
        },
        _ = tokio::time::sleep(deadline) => {
            handle.abort();
            error!(?deadline, "Protocol client did not start in time");
            Err(BootstrapError::new(BootstrapErrorKind::DeadlineExceeded(deadline)).into())
        }
    }
}
