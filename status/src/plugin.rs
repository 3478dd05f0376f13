//! プラグインインターフェース
//!
//! ホストサーバーは具象型に依存せず `Plugin` trait 経由で初期化・ルート登録を行う。

use crate::api::{self, StatusResponse};
use crate::error::PluginError;
use crate::health::HealthChecker;
use crate::probe::DatabaseProbe;
use crate::routes::RouteRegistry;
use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use status_common::config::{ConfigDefaults, EnvSource, ProcessEnv, StatusConfig, StatusSettings};
use status_common::types::HealthReport;
use std::sync::Arc;
use tracing::{debug, info};

/// ステータスプラグインの名前
pub const PLUGIN_NAME: &str = "status";

/// ホストサーバーに組み込むプラグイン
#[async_trait]
pub trait Plugin: Send + Sync {
    /// プラグイン名
    fn name(&self) -> &'static str;

    /// 設定を受け取って初期化する（起動時に1回）
    fn initialize(&mut self, config: PluginConfig) -> Result<(), PluginError>;

    /// 1リクエスト分の処理
    async fn handle(&self) -> Response;

    /// ルーターにエンドポイントを登録する
    fn register_routes(&self, routes: &mut RouteRegistry) -> Result<(), PluginError>;
}

/// 初期化時にホストから渡される設定
#[derive(Clone, Default)]
pub struct PluginConfig {
    /// 明示設定
    pub settings: StatusSettings,
    /// 依存先プローブ（未設定可）
    pub database: Option<Arc<dyn DatabaseProbe>>,
    /// デフォルト値
    pub defaults: ConfigDefaults,
}

impl PluginConfig {
    /// 明示設定から作成
    pub fn new(settings: StatusSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// 依存先プローブを設定
    pub fn with_database(mut self, database: Arc<dyn DatabaseProbe>) -> Self {
        self.database = Some(database);
        self
    }

    /// デフォルト値を差し替える
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }
}

/// 初期化済みの状態
struct Initialized {
    config: StatusConfig,
    checker: HealthChecker,
}

/// ステータスチェックエンドポイントを提供するプラグイン
#[derive(Default)]
pub struct StatusPlugin {
    state: Option<Initialized>,
}

impl StatusPlugin {
    /// 未初期化のプラグインを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 任意の環境変数ソースで初期化する
    pub fn initialize_with_env(&mut self, config: PluginConfig, env: &impl EnvSource) {
        let resolved = StatusConfig::resolve(&config.settings, env, &config.defaults);

        debug!(
            endpoint = %resolved.endpoint,
            base_url = %resolved.base_url(),
            probe_timeout_ms = resolved.probe_timeout.as_millis() as u64,
            database = config.database.is_some(),
            "Status plugin initialized"
        );

        let checker = HealthChecker::new(config.database, resolved.probe_timeout);
        self.state = Some(Initialized {
            config: resolved,
            checker,
        });
    }

    /// 解決済みの設定（未初期化なら `None`）
    pub fn config(&self) -> Option<&StatusConfig> {
        self.state.as_ref().map(|s| &s.config)
    }

    /// ヘルスチェックを1回実行
    ///
    /// 未初期化の場合は依存先なしとして扱う。
    pub async fn check(&self) -> HealthReport {
        match &self.state {
            Some(state) => state.checker.check().await,
            None => HealthReport::not_configured(),
        }
    }
}

#[async_trait]
impl Plugin for StatusPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn initialize(&mut self, config: PluginConfig) -> Result<(), PluginError> {
        self.initialize_with_env(config, &ProcessEnv);
        Ok(())
    }

    async fn handle(&self) -> Response {
        StatusResponse(self.check().await).into_response()
    }

    fn register_routes(&self, routes: &mut RouteRegistry) -> Result<(), PluginError> {
        let state = self
            .state
            .as_ref()
            .ok_or(PluginError::NotInitialized(PLUGIN_NAME))?;
        let path = state.config.route_path();

        debug!(path = %path, port = state.config.port, "Registering status endpoint");
        routes.route(&path, get(api::get_status).with_state(state.checker.clone()))?;

        info!(url = %state.config.endpoint_url(), "Health check available");
        Ok(())
    }
}
