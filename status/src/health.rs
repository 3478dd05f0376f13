//! ヘルスチェック評価
//!
//! リクエストごとに依存先を1回だけ、期限付きでプローブしてレポートを生成する。
//! リトライ・バックオフは行わない。

use crate::error::ProbeError;
use crate::probe::DatabaseProbe;
use status_common::types::HealthReport;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 依存先を評価してヘルスレポートを返す
///
/// 常にレポートを返し、`timeout` を超えて待機しない。期限切れのプローブは
/// drop されて中断され、依存先のエラーと同じ `down` 形式で報告される。
pub async fn evaluate(probe: Option<&dyn DatabaseProbe>, timeout: Duration) -> HealthReport {
    let Some(probe) = probe else {
        return HealthReport::not_configured();
    };

    let start = Instant::now();
    let result = match tokio::time::timeout(timeout, probe.ping()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(timeout)),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => {
            debug!(latency_ms, "Database probe succeeded");
            HealthReport::up()
        }
        Err(e) => {
            warn!(latency_ms, error = %e, "Database probe failed");
            HealthReport::down(e.to_string())
        }
    }
}

/// ヘルスチェッカー
///
/// 初期化後は読み取り専用で、並行リクエスト間で共有してよい。
#[derive(Clone)]
pub struct HealthChecker {
    /// 依存先プローブ（未設定なら `None`）
    probe: Option<Arc<dyn DatabaseProbe>>,
    /// プローブのタイムアウト
    timeout: Duration,
}

impl HealthChecker {
    /// 新しいヘルスチェッカーを作成
    pub fn new(probe: Option<Arc<dyn DatabaseProbe>>, timeout: Duration) -> Self {
        Self { probe, timeout }
    }

    /// 1回分のヘルスチェックを実行
    pub async fn check(&self) -> HealthReport {
        evaluate(self.probe.as_deref(), self.timeout).await
    }
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker")
            .field("probe", &self.probe.as_ref().map(|_| "<probe>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
