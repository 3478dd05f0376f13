//! axumサーバー起動・シャットダウンハンドリング

use crate::shutdown::ShutdownController;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// バインド済みのリスナーでサーバーを起動し、シャットダウン要求を待機する
///
/// OSシグナルで止めたい場合は事前に `ShutdownController::listen_for_signals` を呼ぶ。
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: ShutdownController,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("Status server listening on {}", local_addr);

    let app = router.layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.wait().await;
            info!("Shutdown requested, shutting down...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
