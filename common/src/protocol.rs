//! 通信プロトコル定義
//!
//! プローブ↔RPCノード間のJSON-RPC 2.0バッチメッセージ

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPCバージョン文字列
pub const JSONRPC_VERSION: &str = "2.0";

/// ヘルスチェックメソッド名
pub const METHOD_GET_HEALTH: &str = "getHealth";
/// スロット取得メソッド名
pub const METHOD_GET_SLOT: &str = "getSlot";
/// ブロック高取得メソッド名
pub const METHOD_GET_BLOCK_HEIGHT: &str = "getBlockHeight";

/// バッチ内の位置（レスポンスは位置で対応付ける）
pub const HEALTH_INDEX: usize = 0;
/// スロット応答の位置
pub const SLOT_INDEX: usize = 1;
/// ブロック高応答の位置
pub const BLOCK_HEIGHT_INDEX: usize = 2;
/// バッチの要素数
pub const PROBE_BATCH_LEN: usize = 3;

/// JSON-RPCリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    /// プロトコルバージョン ("2.0")
    pub jsonrpc: String,
    /// リクエストID
    pub id: u64,
    /// メソッド名
    pub method: String,
    /// パラメータ（未指定時は送信しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    /// パラメータなしのリクエストを作成
    pub fn new(id: u64, method: &str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params: None,
        }
    }
}

/// プローブ用バッチリクエスト（health, slot, block height の固定順）
pub fn probe_batch() -> Vec<RpcRequest> {
    vec![
        RpcRequest::new(1, METHOD_GET_HEALTH),
        RpcRequest::new(2, METHOD_GET_SLOT),
        RpcRequest::new(3, METHOD_GET_BLOCK_HEIGHT),
    ]
}

/// JSON-RPCエラーオブジェクト
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcErrorObject {
    /// エラーコード
    pub code: i64,
    /// エラーメッセージ
    pub message: String,
    /// 追加データ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// JSON-RPCレスポンス
///
/// `result` の型はメソッドごとに異なるため `Value` のまま保持し、
/// 数値への変換は呼び出し側で行う。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RpcResponse {
    /// プロトコルバージョン
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// リクエストID（エコー値、対応付けには使わない）
    #[serde(default)]
    pub id: Option<Value>,
    /// 結果
    #[serde(default)]
    pub result: Option<Value>,
    /// エラー
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_batch_order_is_fixed() {
        let batch = probe_batch();

        assert_eq!(batch.len(), PROBE_BATCH_LEN);
        assert_eq!(batch[HEALTH_INDEX].method, METHOD_GET_HEALTH);
        assert_eq!(batch[SLOT_INDEX].method, METHOD_GET_SLOT);
        assert_eq!(batch[BLOCK_HEIGHT_INDEX].method, METHOD_GET_BLOCK_HEIGHT);
        assert_eq!(
            batch.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_probe_batch_wire_format() {
        let value = serde_json::to_value(probe_batch()).unwrap();

        // paramsは送信しない
        assert_eq!(
            value,
            json!([
                {"jsonrpc": "2.0", "id": 1, "method": "getHealth"},
                {"jsonrpc": "2.0", "id": 2, "method": "getSlot"},
                {"jsonrpc": "2.0", "id": 3, "method": "getBlockHeight"}
            ])
        );
    }

    #[test]
    fn test_rpc_response_with_error_object() {
        let json = r#"{"jsonrpc":"2.0","id":1,
            "error":{"code":-32005,"message":"Node is behind by 42 slots"}}"#;
        let response: RpcResponse = serde_json::from_str(json).unwrap();

        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32005);
        assert_eq!(error.message, "Node is behind by 42 slots");
    }

    #[test]
    fn test_rpc_response_tolerates_missing_fields() {
        let response: RpcResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, RpcResponse::default());
    }
}
