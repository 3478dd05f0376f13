//! ヘルスレポート型定義
//!
//! `GET /{endpoint}` のレスポンスボディ。フィールド名とネスト
//! (`status`, `database.status`, `database.error`) は契約の一部。

use serde::{Deserialize, Serialize};

/// 依存先エラーのテキストが空だった場合の代替メッセージ
const UNKNOWN_DEPENDENCY_ERROR: &str = "dependency unavailable";

/// 全体ステータス
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    /// 正常
    Healthy,
    /// 異常
    Unhealthy,
}

/// 依存先（データベース）ステータス
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    /// 依存先が設定されていない
    NotConfigured,
    /// 疎通確認に成功
    Up,
    /// 疎通確認に失敗またはタイムアウト
    Down,
}

/// 依存先のヘルス情報
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyHealth {
    status: DependencyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DependencyHealth {
    /// 依存先ステータス
    pub fn status(&self) -> DependencyStatus {
        self.status
    }

    /// 失敗時のエラー内容
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// リクエストごとに生成されるヘルスレポート
///
/// 依存先が未設定なら常に healthy、設定済みなら `up` のときだけ healthy。
/// コンストラクタ経由でしか生成できないため、この不変条件は型で保証される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    status: OverallStatus,
    database: DependencyHealth,
}

impl HealthReport {
    /// 依存先未設定
    pub fn not_configured() -> Self {
        Self {
            status: OverallStatus::Healthy,
            database: DependencyHealth {
                status: DependencyStatus::NotConfigured,
                error: None,
            },
        }
    }

    /// 依存先の疎通確認に成功
    pub fn up() -> Self {
        Self {
            status: OverallStatus::Healthy,
            database: DependencyHealth {
                status: DependencyStatus::Up,
                error: None,
            },
        }
    }

    /// 依存先の疎通確認に失敗
    pub fn down(error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = UNKNOWN_DEPENDENCY_ERROR.to_string();
        }
        Self {
            status: OverallStatus::Unhealthy,
            database: DependencyHealth {
                status: DependencyStatus::Down,
                error: Some(error),
            },
        }
    }

    /// 全体ステータス
    pub fn status(&self) -> OverallStatus {
        self.status
    }

    /// 依存先のヘルス情報
    pub fn database(&self) -> &DependencyHealth {
        &self.database
    }

    /// healthy かどうか
    pub fn is_healthy(&self) -> bool {
        self.status == OverallStatus::Healthy
    }
}
