//! 依存先プローブ
//!
//! 依存先（データベース等）の疎通確認を抽象化する trait。
//! 実装はキャンセル可能であること（future の drop で中断される）。

use crate::error::ProbeError;
use async_trait::async_trait;
use sqlx::Connection;

/// 依存先の疎通確認
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// 1回だけ疎通確認を行う
    async fn ping(&self) -> Result<(), ProbeError>;
}

#[async_trait]
impl DatabaseProbe for sqlx::SqlitePool {
    async fn ping(&self) -> Result<(), ProbeError> {
        let mut conn = self.acquire().await?;
        conn.ping().await?;
        Ok(())
    }
}
