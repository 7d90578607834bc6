//! Process lifecycle helpers.

use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;

/// Signal-driven shutdown: cancels a token on SIGINT or SIGTERM so the
/// server loop can drain in-flight requests before exiting.
pub struct ShutdownSignal {
    token: CancellationToken,
}

impl ShutdownSignal {
    /// Installs the signal handlers. Fails if the process cannot register
    /// them, which is fatal at startup anyway.
    pub fn try_new() -> std::io::Result<Self> {
        let token = CancellationToken::new();
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => tracing::info!("received SIGINT, shutting down"),
                _ = terminate.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
            trigger.cancel();
        });
        Ok(Self { token })
    }

    /// A token that is cancelled once a shutdown signal arrives.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}
