use std::{io, net::SocketAddr};

use axum::Router;
use status_plugin::{server, shutdown::ShutdownController};
use tokio::{net::TcpListener, task::JoinHandle};

/// テスト用のHTTPサーバー（エフェメラルポートで起動）
#[allow(dead_code)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownController,
    handle: JoinHandle<Result<(), io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    /// サーバーがバインドしているアドレスを返す
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// パスに対応するURLを返す
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// サーバーを停止し、バックグラウンドタスクの終了を待つ
    pub async fn stop(self) {
        self.shutdown.request_shutdown();
        let _ = self.handle.await;
    }
}

/// ルーターを 127.0.0.1 の空きポートで起動する
#[allow(dead_code)]
pub async fn spawn_router(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let shutdown = ShutdownController::default();

    let handle = tokio::spawn(server::serve(listener, router, shutdown.clone()));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}
