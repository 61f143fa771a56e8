//! エラー型定義
//!
//! 共通レイヤーのエラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
