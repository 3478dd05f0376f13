//! ルート登録
//!
//! ホストサーバー側のルーターラッパー。axum の `Router::route` は重複パスで
//! panic するため、登録済みパスを追跡してエラーとして返す。

use crate::error::PluginError;
use axum::{routing::MethodRouter, Router};
use std::collections::BTreeSet;
use tracing::debug;

/// パス → ハンドラーの登録テーブル
#[derive(Default)]
pub struct RouteRegistry {
    router: Router,
    paths: BTreeSet<String>,
}

impl RouteRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存のルーターを引き継いで作成
    ///
    /// `bound_paths` にはホストが `router` に登録済みのパスを渡す。
    /// axum の `Router` は登録済みパスを列挙できないため、ここで申告されたものだけが
    /// 重複検出の対象になる。
    pub fn from_router<I, P>(router: Router, bound_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            router,
            paths: bound_paths.into_iter().map(Into::into).collect(),
        }
    }

    /// ルートを登録
    pub fn route(&mut self, path: &str, handler: MethodRouter) -> Result<(), PluginError> {
        if !path.starts_with('/') || path.len() < 2 {
            return Err(PluginError::InvalidPath(path.to_string()));
        }
        if !self.paths.insert(path.to_string()) {
            return Err(PluginError::RouteConflict(path.to_string()));
        }

        debug!(path, "Registering route");
        self.router = std::mem::take(&mut self.router).route(path, handler);
        Ok(())
    }

    /// axum ルーターに変換
    pub fn into_router(self) -> Router {
        self.router
    }
}
