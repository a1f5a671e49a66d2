use tokio::signal;

/// Resolves once the process receives SIGINT or SIGTERM; the server future
/// is raced against this in `main`.
pub async fn shutdown_signal() {
    let interrupt = async {
        signal::ctrl_c()
            .await
            .expect("SIGINT handler cannot be installed");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        unix_signal(SignalKind::terminate())
            .expect("SIGTERM handler cannot be installed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => tracing::warn!("SIGINT received, shutting down"),
        _ = terminate => tracing::warn!("SIGTERM received, shutting down"),
    }
}
