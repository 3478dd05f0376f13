//! 設定管理
//!
//! ステータスエンドポイントの設定を、明示設定 > 環境変数 > デフォルト値の
//! 優先順位で解決する。解決はフィールドごとに独立して行い、不正な値は
//! 「未設定」として次の優先度へフォールバックする（初期化は失敗しない）。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// エンドポイントパスの環境変数
pub const ENV_ENDPOINT: &str = "STATUS_ENDPOINT";
/// スキームの環境変数
pub const ENV_SCHEME: &str = "STATUS_SCHEME";
/// ホストの環境変数（優先順）
pub const ENV_HOST: [&str; 2] = ["STATUS_HOST", "HOST"];
/// ポートの環境変数（優先順）
pub const ENV_PORT: [&str; 2] = ["STATUS_PORT", "PORT"];
/// プローブタイムアウト（ミリ秒）の環境変数
pub const ENV_PROBE_TIMEOUT_MS: &str = "STATUS_PROBE_TIMEOUT_MS";

/// URLスキーム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// http (既定ポート 80)
    #[default]
    Http,
    /// https (既定ポート 443)
    Https,
}

impl Scheme {
    /// スキームのウェルノウンポート
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    /// 小文字の文字列表現
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// スキーム文字列のパースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported scheme: {0}")]
pub struct ParseSchemeError(pub String);

impl FromStr for Scheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(ParseSchemeError(s.to_string())),
        }
    }
}

/// ポート値（整数・数値文字列のどちらも受け付ける）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// ネイティブ整数
    Number(i64),
    /// 数値文字列
    Text(String),
}

impl PortValue {
    /// `1..=65535` の範囲に正規化する。範囲外・非数値は `None`。
    pub fn normalize(&self) -> Option<u16> {
        match self {
            PortValue::Number(n) => u16::try_from(*n).ok().filter(|p| *p > 0),
            PortValue::Text(s) => parse_port(s),
        }
    }
}

impl From<u16> for PortValue {
    fn from(value: u16) -> Self {
        PortValue::Number(i64::from(value))
    }
}

impl From<&str> for PortValue {
    fn from(value: &str) -> Self {
        PortValue::Text(value.to_string())
    }
}

impl From<String> for PortValue {
    fn from(value: String) -> Self {
        PortValue::Text(value)
    }
}

/// 初期化時に明示的に渡される設定
///
/// ホストから緩い型のマップ（JSON等）で渡された場合も、`serde_json::from_value`
/// で一度だけこの構造体に変換する。型の合わないフィールドは未指定として扱い、
/// 他のフィールドの読み込みは止めない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// エンドポイントパス（先頭スラッシュの有無は問わない）
    #[serde(deserialize_with = "lenient_string")]
    pub endpoint: Option<String>,
    /// 公開URLのスキーム
    #[serde(deserialize_with = "lenient_string")]
    pub scheme: Option<String>,
    /// 公開URLのホスト
    #[serde(deserialize_with = "lenient_string")]
    pub host: Option<String>,
    /// 公開URLのポート
    #[serde(deserialize_with = "lenient_port")]
    pub port: Option<PortValue>,
    /// 依存先プローブのタイムアウト（ミリ秒）
    #[serde(deserialize_with = "lenient_millis")]
    pub probe_timeout_ms: Option<u64>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_port<'de, D>(deserializer: D) -> Result<Option<PortValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().map(PortValue::Number),
        Some(Value::String(s)) => Some(PortValue::Text(s)),
        _ => None,
    })
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

impl StatusSettings {
    /// 緩い型のJSON値から設定を読み込む
    ///
    /// オブジェクト以外の値はエラー。個々のフィールドの型違いはエラーにならない。
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// エンドポイントパスを設定
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// スキームを設定
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// ホストを設定
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// ポートを設定
    pub fn with_port(mut self, port: impl Into<PortValue>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// プローブタイムアウトを設定
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}

/// 環境変数の読み取り元
pub trait EnvSource {
    /// 変数の値を返す（未設定なら `None`）
    fn var(&self, name: &str) -> Option<String>;
}

/// プロセス環境変数
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// 最下位の優先度となるデフォルト値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDefaults {
    /// エンドポイントパス (デフォルト: "status")
    pub endpoint: String,
    /// スキーム (デフォルト: http)
    pub scheme: Scheme,
    /// ホスト (デフォルト: "localhost")
    pub host: String,
    /// ポート (デフォルト: 8000)
    pub port: u16,
    /// プローブタイムアウト (デフォルト: 2秒)
    pub probe_timeout: Duration,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            endpoint: "status".to_string(),
            scheme: Scheme::Http,
            host: "localhost".to_string(),
            port: 8000,
            probe_timeout: Duration::from_secs(2),
        }
    }
}

impl ConfigDefaults {
    /// ホストサーバーの待ち受けアドレスからデフォルトポートを決める
    ///
    /// ポート0（エフェメラル未確定）の場合は既存の値を維持する。
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        if addr.port() > 0 {
            self.port = addr.port();
        }
        self
    }
}

/// 解決済みの設定（初期化後は読み取り専用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    /// エンドポイントパス（先頭スラッシュなし）
    pub endpoint: String,
    /// 公開URLのスキーム
    pub scheme: Scheme,
    /// 公開URLのホスト
    pub host: String,
    /// 公開URLのポート
    pub port: u16,
    /// 依存先プローブのタイムアウト
    pub probe_timeout: Duration,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self::resolve(
            &StatusSettings::default(),
            &HashMap::<String, String>::new(),
            &ConfigDefaults::default(),
        )
    }
}

impl StatusConfig {
    /// 明示設定・環境変数・デフォルト値から設定を解決する
    ///
    /// 入力に対して純粋で、失敗しない。
    pub fn resolve(
        settings: &StatusSettings,
        env: &impl EnvSource,
        defaults: &ConfigDefaults,
    ) -> Self {
        let endpoint = first_valid(
            settings.endpoint.as_deref().and_then(normalize_endpoint),
            [ENV_ENDPOINT],
            env,
            normalize_endpoint,
        )
        .unwrap_or_else(|| defaults.endpoint.clone());

        let scheme = first_valid(
            settings
                .scheme
                .as_deref()
                .and_then(|s| s.parse::<Scheme>().ok()),
            [ENV_SCHEME],
            env,
            |s| s.parse::<Scheme>().ok(),
        )
        .unwrap_or(defaults.scheme);

        let host = first_valid(
            settings.host.as_deref().and_then(normalize_host),
            ENV_HOST,
            env,
            normalize_host,
        )
        .unwrap_or_else(|| defaults.host.clone());

        let port = first_valid(
            settings.port.as_ref().and_then(PortValue::normalize),
            ENV_PORT,
            env,
            parse_port,
        )
        .unwrap_or(defaults.port);

        let probe_timeout = first_valid(
            settings
                .probe_timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            [ENV_PROBE_TIMEOUT_MS],
            env,
            parse_timeout_ms,
        )
        .unwrap_or(defaults.probe_timeout);

        Self {
            endpoint,
            scheme,
            host,
            port,
            probe_timeout,
        }
    }

    /// プロセス環境変数と標準デフォルトで解決する
    pub fn from_settings(settings: &StatusSettings) -> Self {
        Self::resolve(settings, &ProcessEnv, &ConfigDefaults::default())
    }

    /// ルーターに登録するパス（先頭スラッシュ付き）
    pub fn route_path(&self) -> String {
        format!("/{}", self.endpoint)
    }

    /// 公開ベースURL
    ///
    /// スキームのウェルノウンポートと一致する場合はポートを省略する。
    /// IPv6リテラルは角括弧で囲む。
    pub fn base_url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == self.scheme.default_port() {
            format!("{}://{}", self.scheme, host)
        } else {
            format!("{}://{}:{}", self.scheme, host, self.port)
        }
    }

    /// ヘルスチェックの完全なURL
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url(), self.route_path())
    }
}

/// 明示設定、続いて環境変数を順に試し、最初の有効な値を返す
fn first_valid<T, const N: usize>(
    explicit: Option<T>,
    env_names: [&str; N],
    env: &impl EnvSource,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    explicit.or_else(|| {
        env_names
            .iter()
            .filter_map(|name| env.var(name))
            .find_map(|value| parse(&value))
    })
}

fn normalize_endpoint(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let invalid = trimmed
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ':' | '*' | '{' | '}' | '?' | '#'));
    if invalid || trimmed.contains("//") {
        return None;
    }
    Some(trimmed.to_string())
}

fn normalize_host(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p > 0)
}

fn parse_timeout_ms(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
