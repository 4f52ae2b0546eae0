use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Serves `app` on `bind` until `cancel` fires, then drains in-flight
/// requests.
///
/// # Errors
///
/// Binding or serving failures from the listener.
pub async fn run_webhook_server(
    bind: &str,
    app: Router,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(bind = %listener.local_addr()?, "MAX webhook server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    tracing::info!("MAX webhook server stopped");
    Ok(())
}
