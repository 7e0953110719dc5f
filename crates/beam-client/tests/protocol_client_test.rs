//! Protocol Client Integration Tests
//!
//! These tests drive both protocol generations against an axum mock access
//! node and verify:
//! - Method names and parameter casing per generation
//! - Translation into the common domain records
//! - Backend error propagation
//! - Response size ceilings

use axum::{extract::State, routing::post, Json, Router};
use beam_client::{ClientConfig, ProtocolClient};
use beam_common::{BeamError, Identifier, NodeDescriptor};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct MockState {
    results: HashMap<String, Value>,
    requests: Vec<(String, Value)>,
}

/// Mock access node answering canned JSON-RPC results per method.
struct MockAccessNode {
    addr: String,
    state: Arc<Mutex<MockState>>,
}

impl MockAccessNode {
    async fn start() -> Self {
        async fn handle(State(state): State<Arc<Mutex<MockState>>>, Json(req): Json<Value>) -> Json<Value> {
            let method = req["method"].as_str().unwrap_or_default().to_string();
            let mut state = state.lock().await;
            state.requests.push((method.clone(), req["params"].clone()));
            let body = match state.results.get(&method) {
                Some(result) => json!({"jsonrpc": "2.0", "result": result, "id": req["id"]}),
                None => json!({
                    "jsonrpc": "2.0",
                    "error": {"code": -32601, "message": "Method not found"},
                    "id": req["id"],
                }),
            };
            Json(body)
        }

        let state = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().route("/", post(handle)).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    async fn respond(&self, method: &str, result: Value) {
        self.state.lock().await.results.insert(method.to_string(), result);
    }

    async fn requests(&self) -> Vec<(String, Value)> {
        self.state.lock().await.requests.clone()
    }

    fn descriptor(&self, legacy: bool) -> NodeDescriptor {
        let node = NodeDescriptor::new(0, 0, self.addr.clone());
        if legacy {
            node.legacy()
        } else {
            node
        }
    }
}

fn id(byte: u8) -> Identifier {
    Identifier::new([byte; 32])
}

#[tokio::test]
async fn test_current_events_preserve_timestamp() {
    let node = MockAccessNode::start().await;
    node.respond(
        "access_getEventsForHeightRange",
        json!({"results": [{
            "blockId": id(1).to_string(),
            "blockHeight": 100,
            "blockTimestamp": {"seconds": 1_700_000_100, "nanos": 0},
            "events": [{
                "type": "A.Transfer",
                "transactionId": id(2).to_string(),
                "transactionIndex": 0,
                "eventIndex": 1,
                "payload": "aGk="
            }]
        }]}),
    )
    .await;

    let mut client = ProtocolClient::connect(&node.descriptor(false)).await.unwrap();
    assert!(!client.is_legacy());
    let blocks = client.get_events_for_height_range("A.Transfer", 100, 100).await.unwrap();
    client.close().await;

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].timestamp, 1_700_000_100);
    assert_eq!(blocks[0].events[0].transaction_id, id(2));
    assert_eq!(blocks[0].events[0].payload, b"hi".to_vec());

    let requests = node.requests().await;
    assert_eq!(requests[0].0, "access_getEventsForHeightRange");
    assert_eq!(requests[0].1, json!({"type": "A.Transfer", "startHeight": 100, "endHeight": 100}));
}

#[tokio::test]
async fn test_legacy_events_have_zero_timestamp_and_hash_ids() {
    let node = MockAccessNode::start().await;
    node.respond(
        "legacy_access_getEventsForHeightRange",
        json!({"results": [{
            "block_id": id(3).to_string(),
            "block_height": 7,
            "events": [{
                "type": "A.Transfer",
                "transaction_id": "AQID",
                "transaction_index": 4,
                "event_index": 0,
                "payload": ""
            }]
        }]}),
    )
    .await;

    let mut client = ProtocolClient::connect(&node.descriptor(true)).await.unwrap();
    assert!(client.is_legacy());
    let blocks = client.get_events_for_height_range("A.Transfer", 5, 9).await.unwrap();
    client.close().await;

    assert_eq!(blocks[0].timestamp, 0);
    assert_eq!(blocks[0].height, 7);
    assert_eq!(blocks[0].events[0].transaction_id, Identifier::from_hash(&[1, 2, 3]));

    let requests = node.requests().await;
    assert_eq!(requests[0].0, "legacy_access_getEventsForHeightRange");
    assert_eq!(requests[0].1, json!({"type": "A.Transfer", "start_height": 5, "end_height": 9}));
}

#[tokio::test]
async fn test_point_lookups_on_current_node() {
    let node = MockAccessNode::start().await;
    node.respond(
        "access_getBlockByHeight",
        json!({"block": {
            "id": id(9).to_string(),
            "height": 55,
            "timestamp": {"seconds": 42},
            "collectionGuarantees": [{"collectionId": id(10).to_string()}]
        }}),
    )
    .await;
    node.respond(
        "access_getCollectionByID",
        json!({"collection": {"id": id(10).to_string(), "transactionIds": [id(11).to_string()]}}),
    )
    .await;
    node.respond(
        "access_getTransactionResult",
        json!({
            "status": 4,
            "statusCode": 0,
            "errorMessage": "",
            "events": [{"type": "A.Done", "transactionIndex": 0, "eventIndex": 2, "payload": "AA=="}]
        }),
    )
    .await;
    node.respond("access_getLatestBlockHeader", json!({"block": {"id": id(1).to_string(), "height": 9001}}))
        .await;
    node.respond("access_executeScriptAtLatestBlock", json!({"value": "eyJ2IjoxfQ=="}))
        .await;

    let mut client = ProtocolClient::connect(&node.descriptor(false)).await.unwrap();

    let block = client.get_block_by_height(55).await.unwrap();
    assert_eq!(block.timestamp, 42);
    assert_eq!(block.collection_ids, vec![id(10)]);

    let collection = client.get_collection_by_id(&id(10)).await.unwrap();
    assert_eq!(collection.transaction_ids, vec![id(11)]);

    let result = client.get_transaction_result(&id(11)).await.unwrap();
    assert_eq!(result.status, 4);
    assert_eq!(result.events[0].event_index, 2);
    assert_eq!(result.events[0].payload, vec![0]);

    assert_eq!(client.get_latest_block_header().await.unwrap(), 9001);

    let value = client.execute_script("pub fun main(): Int { return 1 }", vec![b"1".to_vec()]).await.unwrap();
    assert_eq!(value, br#"{"v":1}"#.to_vec());

    client.close().await;

    let requests = node.requests().await;
    assert_eq!(requests.len(), 5);
    assert_eq!(requests[1].1, json!({"id": id(10).to_string()}));
    assert_eq!(requests[3].1, json!({"isSealed": true}));
    assert_eq!(requests[4].1["arguments"], json!(["MQ=="]));
}

#[tokio::test]
async fn test_legacy_latest_header_is_sealed() {
    let node = MockAccessNode::start().await;
    node.respond("legacy_access_getLatestBlockHeader", json!({"block": {"height": 12}}))
        .await;

    let mut client = ProtocolClient::connect(&node.descriptor(true)).await.unwrap();
    assert_eq!(client.get_latest_block_header().await.unwrap(), 12);
    client.close().await;

    let requests = node.requests().await;
    assert_eq!(requests[0].1, json!({"is_sealed": true}));
}

#[tokio::test]
async fn test_backend_error_is_propagated() {
    let node = MockAccessNode::start().await;

    let mut client = ProtocolClient::connect(&node.descriptor(false)).await.unwrap();
    let err = client.get_block_by_height(1).await.unwrap_err();
    client.close().await;

    assert!(matches!(err, BeamError::Rpc { code: -32601, .. }));
    assert!(err.is_backend());
}

#[tokio::test]
async fn test_response_ceiling_applies_to_point_calls() {
    let node = MockAccessNode::start().await;
    node.respond("access_executeScriptAtLatestBlock", json!({"value": "A".repeat(8192)}))
        .await;

    let config = ClientConfig {
        max_response_bytes: 1024,
        max_large_response_bytes: 1024 * 1024,
    };
    let mut client = ProtocolClient::connect_with_config(&node.descriptor(false), config)
        .await
        .unwrap();
    let err = client.execute_script("x", vec![]).await.unwrap_err();
    assert!(matches!(err, BeamError::ResponseTooLarge(1024)));
}

#[tokio::test]
async fn test_events_and_transaction_results_use_large_ceiling() {
    // 4096 base64 chars decode to 3072 bytes, well past the 1 KiB default ceiling
    let payload = "A".repeat(4096);
    let config = ClientConfig {
        max_response_bytes: 1024,
        max_large_response_bytes: 1 << 20,
    };

    for legacy in [false, true] {
        let node = MockAccessNode::start().await;
        let prefix = if legacy { "legacy_access_" } else { "access_" };

        let events = if legacy {
            json!({"results": [{
                "block_id": id(1).to_string(),
                "block_height": 3,
                "events": [{
                    "type": "A.Big",
                    "transaction_id": "AQID",
                    "transaction_index": 0,
                    "event_index": 0,
                    "payload": payload
                }]
            }]})
        } else {
            json!({"results": [{
                "blockId": id(1).to_string(),
                "blockHeight": 3,
                "events": [{
                    "type": "A.Big",
                    "transactionId": id(2).to_string(),
                    "transactionIndex": 0,
                    "eventIndex": 0,
                    "payload": payload
                }]
            }]})
        };
        let tx_result = if legacy {
            json!({
                "status": 4,
                "status_code": 0,
                "events": [{"type": "A.Big", "transaction_index": 0, "event_index": 1, "payload": payload}]
            })
        } else {
            json!({
                "status": 4,
                "statusCode": 0,
                "events": [{"type": "A.Big", "transactionIndex": 0, "eventIndex": 1, "payload": payload}]
            })
        };

        node.respond(&format!("{}getEventsForHeightRange", prefix), events).await;
        node.respond(&format!("{}getTransactionResult", prefix), tx_result).await;
        node.respond(
            &format!("{}getBlockByHeight", prefix),
            json!({"block": {"id": id(1).to_string(), "height": 3, "padding": payload}}),
        )
        .await;

        let descriptor = node.descriptor(legacy);
        let mut client = ProtocolClient::connect_with_config(&descriptor, config).await.unwrap();

        let blocks = client.get_events_for_height_range("A.Big", 3, 3).await.unwrap();
        assert_eq!(blocks[0].events[0].payload.len(), 3072, "legacy={}", legacy);

        let result = client.get_transaction_result(&id(2)).await.unwrap();
        assert_eq!(result.events[0].payload.len(), 3072, "legacy={}", legacy);

        let err = client.get_block_by_height(3).await.unwrap_err();
        assert!(matches!(err, BeamError::ResponseTooLarge(1024)), "legacy={}: {:?}", legacy, err);

        client.close().await;
    }
}
