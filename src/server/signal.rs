// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM request a graceful shutdown. Other platforms
// only get Ctrl+C.

/// Resolves once a shutdown signal arrives.
///
/// If no handler can be registered the future never resolves, so the server
/// keeps running rather than exiting at once.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            crate::logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            None
        }
    };

    let terminate = async {
        match sigterm.as_mut() {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        () = terminate => tracing::info!("SIGTERM received"),
        () = interrupt() => tracing::info!("SIGINT received"),
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    interrupt().await;
    tracing::info!("Ctrl+C received");
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        crate::logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
