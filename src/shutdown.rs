use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Wait for a termination signal. Used to abandon waits that have no timeout
/// of their own, such as the login redirect.
#[cfg(unix)]
pub async fn wait_for_signal() {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        _ => {
            warn!("Failed to install signal handlers, falling back to Ctrl+C");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, cancelling");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, cancelling");
        }
    }
}

/// Wait for a termination signal
#[cfg(windows)]
pub async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl+C signal, cancelling");
    } else {
        warn!("Failed to listen for Ctrl+C");
    }
}
