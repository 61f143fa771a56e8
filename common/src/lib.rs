//! Slotwatch 共通ライブラリ
//!
//! プローブ本体とテストで共有する型・設定・プロトコル定義

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型
pub mod error;

/// JSON-RPCプロトコル定義
pub mod protocol;

/// コアデータ型
pub mod types;
