//! JSON-RPC 2.0 Envelope
//!
//! Both backend protocol generations speak JSON-RPC 2.0 over HTTP POST. This
//! module holds the request/response envelope shared by the two schemas.
//!
//! - Request format: `{"jsonrpc": "2.0", "method": "...", "params": ..., "id": ...}`
//! - Response format: `{"jsonrpc": "2.0", "result": ..., "error": ..., "id": ...}`
//! - Error format: `{"code": ..., "message": "...", "data": ...}`
//!
//! # Example
//!
//! ```
//! use beam_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new("access_getLatestBlockHeader", json!({"isSealed": true}), json!(1));
//! assert_eq!(request.jsonrpc, "2.0");
//!
//! let response: JsonRpcResponse =
//!     serde_json::from_str(r#"{"jsonrpc":"2.0","result":{"block":{"height":7}},"id":1}"#).unwrap();
//! assert_eq!(response.into_result().unwrap()["block"]["height"], 7);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{BeamError, Result};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params,
            id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<JsonRpcError> for BeamError {
    fn from(err: JsonRpcError) -> Self {
        BeamError::Rpc {
            code: err.code,
            message: err.message,
        }
    }
}

impl JsonRpcResponse {
    /// Unwraps the envelope: the error object wins over any result.
    pub fn into_result(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        self.result
            .ok_or_else(|| BeamError::InvalidResponse("response missing result".to_string()))
    }
}
