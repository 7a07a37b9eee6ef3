use anyhow::Result;
use tokio::signal;

/// Resolve on Ctrl+C or SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> Result<()> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result?;
            tracing::info!("received Ctrl+C");
        }
        result = sigterm() => {
            result?;
            tracing::info!("received SIGTERM");
        }
    }
    tracing::info!("shutdown signal received, draining connections");
    Ok(())
}

#[cfg(unix)]
async fn sigterm() -> Result<()> {
    let mut handler = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    handler.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn sigterm() -> Result<()> {
    std::future::pending::<Result<()>>().await
}
