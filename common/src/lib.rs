//! ステータスプラグイン共通型
//!
//! 設定の解決ロジックとヘルスレポートの型を提供する。

#![warn(missing_docs)]

/// 設定管理（優先順位付きの設定解決）
pub mod config;

/// ヘルスレポート型定義
pub mod types;
