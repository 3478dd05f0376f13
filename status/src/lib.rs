//! Status plugin
//!
//! ホストHTTPサーバーに組み込むヘルスチェックエンドポイント。
//! 依存先（データベース）を期限付きで1回プローブし、結果をJSONで返す。

#![warn(missing_docs)]

/// ステータスAPIレスポンス
pub mod api;

/// CLIインターフェース
pub mod cli;

/// エラー型定義
pub mod error;

/// ヘルスチェック評価
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// プラグインインターフェース
pub mod plugin;

/// 依存先プローブ
pub mod probe;

/// ルート登録
pub mod routes;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

pub use error::{PluginError, ProbeError};
pub use health::{evaluate, HealthChecker};
pub use plugin::{Plugin, PluginConfig, StatusPlugin};
pub use probe::DatabaseProbe;
pub use routes::RouteRegistry;
pub use status_common::config::{ConfigDefaults, Scheme, StatusConfig, StatusSettings};
pub use status_common::types::HealthReport;
