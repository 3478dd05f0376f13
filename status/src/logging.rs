//! ロギング初期化
//!
//! `STATUS_LOG_LEVEL`（未設定なら `RUST_LOG`、どちらもなければ `info`）を
//! `EnvFilter` ディレクティブとして解釈する。

use tracing_subscriber::EnvFilter;

/// ログレベルの環境変数
pub const ENV_LOG_LEVEL: &str = "STATUS_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";

/// ログフィルタ文字列を環境変数から取得
pub fn log_directive() -> String {
    [ENV_LOG_LEVEL, "RUST_LOG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// tracing サブスクライバーを初期化
///
/// 不正なディレクティブは `info` にフォールバックする。
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(log_directive())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}
