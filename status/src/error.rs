//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use std::time::Duration;
use thiserror::Error;

/// 依存先プローブのエラー
///
/// ヘルスレポート内で `down` として表現され、呼び出し元には伝播しない。
#[derive(Debug, Error)]
pub enum ProbeError {
    /// 依存先がエラーを返した
    #[error("{0}")]
    Failed(String),

    /// データベースエラー
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// 期限切れ
    #[error("context deadline exceeded after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl ProbeError {
    /// 任意のメッセージから失敗エラーを作成
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// プラグイン登録・初期化のエラー
///
/// ホストは起動時の致命的エラーとして扱う。
#[derive(Debug, Error)]
pub enum PluginError {
    /// 同じパスに既にルートが登録されている
    #[error("Route already bound: {0}")]
    RouteConflict(String),

    /// パスの形式が不正
    #[error("Invalid route path: {0}")]
    InvalidPath(String),

    /// 初期化前にルート登録が要求された
    #[error("Plugin '{0}' is not initialized")]
    NotInitialized(&'static str),
}
