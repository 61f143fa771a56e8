//! 共通型定義
//!
//! Endpoint, ProbeResult, LagRecord等のコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RPCエンドポイント（URL文字列）
///
/// 起動時に一度だけ読み込まれ、プロセス終了まで変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// URL文字列からエンドポイントを作成
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// URL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// http(s)スキームを持つか
    pub fn has_http_scheme(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// 1エンドポイント・1ティック分の計測結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeResult {
    /// スロット
    pub slot: u64,
    /// ブロック高
    pub block_height: u64,
}

impl ProbeResult {
    /// 「取得不可」を表す番兵値 (0, 0)
    pub const UNAVAILABLE: ProbeResult = ProbeResult {
        slot: 0,
        block_height: 0,
    };

    /// 計測結果を作成
    pub fn new(slot: u64, block_height: u64) -> Self {
        Self { slot, block_height }
    }
}

/// `getHealth` の結果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum NodeHealth {
    /// `"ok"` が返った
    Ok,
    /// RPCエラーが返った（メッセージ付き）
    Unhealthy(String),
    /// 判定不能
    #[default]
    Unknown,
}

impl NodeHealth {
    /// 表示用文字列
    pub fn as_str(&self) -> &str {
        match self {
            NodeHealth::Ok => "ok",
            NodeHealth::Unhealthy(_) => "unhealthy",
            NodeHealth::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeHealth::Unhealthy(message) => write!(f, "unhealthy ({})", message),
            other => f.write_str(other.as_str()),
        }
    }
}

/// 遅延記録（閾値超過時のみログへ書き出す）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagRecord {
    /// 対象エンドポイント
    pub endpoint: Endpoint,
    /// 基準スロット − 対象スロット（負値は対象が先行）
    pub slot_diff: i64,
    /// 計測時刻
    pub observed_at: DateTime<Utc>,
}

impl LagRecord {
    /// 現在時刻で記録を作成
    pub fn new(endpoint: Endpoint, slot_diff: i64) -> Self {
        Self {
            endpoint,
            slot_diff,
            observed_at: Utc::now(),
        }
    }

    /// ログ1行分の文字列（改行なし）
    pub fn to_log_line(&self, reference_label: &str) -> String {
        format!(
            "{} is {} slots behind {}",
            self.endpoint, self.slot_diff, reference_label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_scheme_check() {
        assert!(Endpoint::new("https://a").has_http_scheme());
        assert!(Endpoint::new("http://127.0.0.1:8899").has_http_scheme());
        assert!(!Endpoint::new("ws://a").has_http_scheme());
        assert!(!Endpoint::new("api.mainnet-beta.solana.com").has_http_scheme());
    }

    #[test]
    fn test_endpoint_serializes_as_plain_string() {
        let json = serde_json::to_string(&Endpoint::new("https://a")).unwrap();
        assert_eq!(json, "\"https://a\"");
    }

    #[test]
    fn test_probe_result_sentinel() {
        assert_eq!(ProbeResult::default(), ProbeResult::UNAVAILABLE);
        assert_ne!(ProbeResult::new(1, 0), ProbeResult::UNAVAILABLE);
        assert_ne!(ProbeResult::new(0, 1), ProbeResult::UNAVAILABLE);
    }

    #[test]
    fn test_node_health_display() {
        assert_eq!(NodeHealth::Ok.to_string(), "ok");
        assert_eq!(NodeHealth::Unknown.to_string(), "unknown");
        assert_eq!(
            NodeHealth::Unhealthy("Node is behind".to_string()).to_string(),
            "unhealthy (Node is behind)"
        );
    }

    #[test]
    fn test_lag_record_log_line() {
        let record = LagRecord::new(Endpoint::new("https://a"), 6);
        assert_eq!(
            record.to_log_line("mainnet"),
            "https://a is 6 slots behind mainnet"
        );

        // 負値もそのまま出力
        let ahead = LagRecord::new(Endpoint::new("https://b"), -2);
        assert_eq!(
            ahead.to_log_line("mainnet"),
            "https://b is -2 slots behind mainnet"
        );
    }
}
