//! 協調的シャットダウン
//!
//! サーバーは `ShutdownController` だけを待機する。OSシグナル（Ctrl+C / SIGTERM）は
//! `listen_for_signals` がコントローラーへの要求に変換し、テストや組み込み先の
//! ホストは `request_shutdown` を直接呼ぶ。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// シャットダウン要求の共有ハンドル
#[derive(Clone, Debug, Default)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownController {
    /// シャットダウンが要求済みか
    pub fn is_shutdown_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// シャットダウンを要求し、待機中のタスクをすべて起こす
    pub fn request_shutdown(&self) {
        self.inner.requested.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// シャットダウンが要求されるまで待機
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        if self.is_shutdown_requested() {
            return;
        }
        notified.await;
    }

    /// OSシグナルを受けたらシャットダウンを要求するタスクを起動
    ///
    /// 他の経路でシャットダウンが要求された場合もタスクは終了する。
    pub fn listen_for_signals(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = ctrl_c() => {
                    info!("Received Ctrl+C, shutting down...");
                    controller.request_shutdown();
                }
                _ = terminate() => {
                    info!("Received SIGTERM, shutting down...");
                    controller.request_shutdown();
                }
                _ = controller.wait() => {}
            }
        })
    }
}

/// Ctrl+C を待機（ハンドラーを登録できなければ永久に待機）
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut signal) => {
            signal.recv().await;
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
