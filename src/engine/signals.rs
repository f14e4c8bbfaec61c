// src/engine/signals.rs

//! OS termination signals.

use std::future::Future;

use tracing::info;

use crate::errors::Result;

/// Register for SIGINT, SIGTERM and SIGHUP (Ctrl-C only on non-Unix) and
/// return a future that resolves on the first one received.
///
/// Registration happens eagerly so signals arriving before the future is
/// first polled are not lost. Must be called inside a Tokio runtime.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    Ok(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = hangup.recv() => "SIGHUP",
        };
        info!(signal = name, "received termination signal");
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!(signal = "ctrl-c", "received termination signal"),
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    })
}
