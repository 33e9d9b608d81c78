//! Signal handling for graceful shutdown.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Installs SIGTERM + SIGINT handlers that cancel the given token.
///
/// If a handler cannot be registered the token is cancelled immediately so
/// the service shuts down instead of running without a way to stop it.
pub fn setup_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        result = tokio::signal::ctrl_c() => match result {
                            Ok(()) => info!("Received SIGINT"),
                            Err(e) => error!(error = %e, "Failed to listen for SIGINT"),
                        },
                        _ = sigterm.recv() => info!("Received SIGTERM"),
                    }
                }
                Err(e) => error!(error = %e, "Failed to register SIGTERM handler"),
            }
        }

        #[cfg(not(unix))]
        {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received SIGINT"),
                Err(e) => error!(error = %e, "Failed to listen for SIGINT"),
            }
        }

        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_token_untouched_without_signal() {
        let cancel = CancellationToken::new();
        setup_signal_handler(cancel.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!cancel.is_cancelled());
    }
}
