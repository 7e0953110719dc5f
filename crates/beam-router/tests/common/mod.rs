//! Mock access nodes for router integration tests.
//!
//! A mock answers both protocol generations. Event queries return one block
//! per requested height with a single event, so callers can check exactly
//! which heights each node was asked for.

#![allow(dead_code)]

use axum::{extract::State, routing::post, Json, Router};
use beam_common::{Identifier, NodeDescriptor};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const BLOCK_TIME: i64 = 1_700_000_000;

#[derive(Default)]
struct MockState {
    legacy: bool,
    failing: AtomicBool,
    calls: AtomicUsize,
    latest_height: u64,
    ranges: Mutex<Vec<(u64, u64)>>,
}

pub struct MockAccessNode {
    pub addr: String,
    state: Arc<MockState>,
}

pub fn block_id(height: u64) -> Identifier {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&height.to_be_bytes());
    Identifier::new(bytes)
}

impl MockAccessNode {
    pub async fn current(latest_height: u64) -> Self {
        Self::start(false, latest_height).await
    }

    pub async fn legacy(latest_height: u64) -> Self {
        Self::start(true, latest_height).await
    }

    async fn start(legacy: bool, latest_height: u64) -> Self {
        let state = Arc::new(MockState {
            legacy,
            latest_height,
            ..Default::default()
        });

        let app = Router::new().route("/", post(handle)).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Height ranges requested through event queries, in order.
    pub fn ranges(&self) -> Vec<(u64, u64)> {
        self.state.ranges.lock().unwrap().clone()
    }

    pub fn descriptor(&self, start: u64, end: u64) -> NodeDescriptor {
        let node = NodeDescriptor::new(start, end, self.addr.clone());
        if self.state.legacy {
            node.legacy()
        } else {
            node
        }
    }
}

async fn handle(State(state): State<Arc<MockState>>, Json(req): Json<Value>) -> Json<Value> {
    state.calls.fetch_add(1, Ordering::SeqCst);
    let id = req["id"].clone();

    if state.failing.load(Ordering::SeqCst) {
        return Json(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32603, "message": "node is down"},
            "id": id,
        }));
    }

    let method = req["method"].as_str().unwrap_or_default();
    let params = &req["params"];
    let prefix = if state.legacy { "legacy_access_" } else { "access_" };

    let result = match method.strip_prefix(prefix) {
        Some("getEventsForHeightRange") => events(&state, params),
        Some("getLatestBlockHeader") => json!({"block": {"height": state.latest_height}}),
        Some("getBlockByHeight") => {
            let height = params["height"].as_u64().unwrap_or_default();
            json!({"block": {
                "id": block_id(height).to_string(),
                "height": height,
                "timestamp": {"seconds": BLOCK_TIME},
            }})
        }
        Some("executeScriptAtLatestBlock") => {
            // echo the argument count back as a JSON value
            let count = params["arguments"].as_array().map(Vec::len).unwrap_or_default();
            let value = serde_json::to_vec(&json!({"arguments": count})).unwrap();
            json!({"value": base64_encode(&value)})
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32601, "message": format!("unknown method {}", method)},
                "id": id,
            }))
        }
    };

    Json(json!({"jsonrpc": "2.0", "result": result, "id": id}))
}

fn events(state: &MockState, params: &Value) -> Value {
    let (start, end) = if state.legacy {
        (params["start_height"].as_u64().unwrap(), params["end_height"].as_u64().unwrap())
    } else {
        (params["startHeight"].as_u64().unwrap(), params["endHeight"].as_u64().unwrap())
    };
    state.ranges.lock().unwrap().push((start, end));

    let event_type = params["type"].clone();
    let results: Vec<Value> = (start..=end)
        .map(|height| {
            if state.legacy {
                json!({
                    "block_id": block_id(height).to_string(),
                    "block_height": height,
                    "events": [{
                        "type": event_type,
                        "transaction_id": base64_encode(&height.to_be_bytes()),
                        "transaction_index": 0,
                        "event_index": 0,
                        "payload": "",
                    }]
                })
            } else {
                json!({
                    "blockId": block_id(height).to_string(),
                    "blockHeight": height,
                    "blockTimestamp": {"seconds": BLOCK_TIME, "nanos": 0},
                    "events": [{
                        "type": event_type,
                        "transactionId": block_id(height).to_string(),
                        "transactionIndex": 0,
                        "eventIndex": 0,
                        "payload": "",
                    }]
                })
            }
        })
        .collect();

    json!({"results": results})
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    STANDARD.encode(bytes)
}
