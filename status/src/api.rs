//! ステータスAPIレスポンス
//!
//! ヘルスレポートをHTTPレスポンスに変換する。

use crate::health::HealthChecker;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use status_common::types::HealthReport;

/// axum用のヘルスレポートレスポンス型
///
/// healthy なら `200 OK`、それ以外は `503 Service Unavailable`。
#[derive(Debug)]
pub struct StatusResponse(pub HealthReport);

impl StatusResponse {
    /// レポートに対応するHTTPステータス
    pub fn status_code(&self) -> StatusCode {
        if self.0.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl From<HealthReport> for StatusResponse {
    fn from(report: HealthReport) -> Self {
        StatusResponse(report)
    }
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.0)).into_response()
    }
}

/// GET /{endpoint}
pub async fn get_status(State(checker): State<HealthChecker>) -> StatusResponse {
    StatusResponse(checker.check().await)
}
