//! 設定管理
//!
//! ProbeConfig設定構造体

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CommonError;

/// プローブ設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// 基準RPCエンドポイント (デフォルト: "https://api.mainnet-beta.solana.com")
    #[serde(default = "default_reference_url")]
    pub reference_url: String,

    /// ログ行で使う基準名 (デフォルト: "mainnet")
    #[serde(default = "default_reference_label")]
    pub reference_label: String,

    /// 比較対象エンドポイント一覧ファイル (デフォルト: "nodes.txt")
    #[serde(default = "default_nodes_path")]
    pub nodes_path: PathBuf,

    /// 遅延ログファイル (デフォルト: "behind.log")
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// ログ出力する遅延閾値（スロット）(デフォルト: 4)
    #[serde(default = "default_lag_threshold")]
    pub lag_threshold: i64,

    /// ポーリング間隔（秒）(デフォルト: 3)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// リクエストタイムアウト（秒）(デフォルト: 2)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// 同時取得数の上限 (デフォルト: 16)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// ティックごとに画面をクリアする (デフォルト: true)
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
}

fn default_reference_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_reference_label() -> String {
    "mainnet".to_string()
}

fn default_nodes_path() -> PathBuf {
    PathBuf::from("nodes.txt")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("behind.log")
}

fn default_lag_threshold() -> i64 {
    4
}

fn default_poll_interval() -> u64 {
    3
}

fn default_request_timeout() -> u64 {
    2
}

fn default_max_concurrency() -> usize {
    16
}

fn default_clear_screen() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            reference_url: default_reference_url(),
            reference_label: default_reference_label(),
            nodes_path: default_nodes_path(),
            log_path: default_log_path(),
            lag_threshold: default_lag_threshold(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            max_concurrency: default_max_concurrency(),
            clear_screen: default_clear_screen(),
        }
    }
}

impl ProbeConfig {
    /// ポーリング間隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// 1リクエストのタイムアウト
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 1ティック全体の締め切り（ポーリング間隔と同じ）
    pub fn tick_deadline(&self) -> Duration {
        self.poll_interval()
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), CommonError> {
        if !(self.reference_url.starts_with("http://")
            || self.reference_url.starts_with("https://"))
        {
            return Err(CommonError::Validation(format!(
                "reference_url must be an http(s) URL: {}",
                self.reference_url
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(CommonError::Validation(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CommonError::Validation(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(CommonError::Validation(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
