//! Client for the legacy access protocol generation.
//!
//! Methods are prefixed `legacy_access_` and fields are snake_case. Event
//! blocks carry no timestamp, and event transaction ids arrive as raw hash
//! bytes that are folded into 32-byte identifiers.

use beam_common::protocol::types::{base64_bytes, base64_bytes_list};
use beam_common::transport::HttpConnection;
use beam_common::{
    Block, BlockEventsRecord, Collection, EventRecord, Identifier, Result, TransactionEvent,
    TransactionResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{decode, ClientConfig};

pub(crate) mod wire {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    pub struct Timestamp {
        #[serde(default)]
        pub seconds: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct EventsResponse {
        #[serde(default)]
        pub results: Vec<BlockEvents>,
    }

    #[derive(Debug, Deserialize)]
    pub struct BlockEvents {
        pub block_id: Identifier,
        pub block_height: u64,
        #[serde(default)]
        pub events: Vec<Event>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Event {
        #[serde(rename = "type")]
        pub event_type: String,
        #[serde(with = "base64_bytes")]
        pub transaction_id: Vec<u8>,
        pub transaction_index: u32,
        pub event_index: u32,
        #[serde(default, with = "base64_bytes")]
        pub payload: Vec<u8>,
    }

    #[derive(Debug, Deserialize)]
    pub struct BlockResponse {
        pub block: Block,
    }

    #[derive(Debug, Deserialize)]
    pub struct Block {
        pub id: Identifier,
        pub height: u64,
        #[serde(default)]
        pub timestamp: Option<Timestamp>,
        #[serde(default)]
        pub collection_guarantees: Vec<CollectionGuarantee>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CollectionGuarantee {
        pub collection_id: Identifier,
    }

    #[derive(Debug, Deserialize)]
    pub struct CollectionResponse {
        pub collection: Collection,
    }

    #[derive(Debug, Deserialize)]
    pub struct Collection {
        pub id: Identifier,
        #[serde(default)]
        pub transaction_ids: Vec<Identifier>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TransactionResultResponse {
        #[serde(default)]
        pub status: i32,
        #[serde(default)]
        pub status_code: u32,
        #[serde(default)]
        pub error_message: String,
        #[serde(default)]
        pub events: Vec<TransactionEvent>,
    }

    #[derive(Debug, Deserialize)]
    pub struct TransactionEvent {
        #[serde(rename = "type")]
        pub event_type: String,
        pub transaction_index: u32,
        pub event_index: u32,
        #[serde(default, with = "base64_bytes")]
        pub payload: Vec<u8>,
    }

    #[derive(Debug, Deserialize)]
    pub struct HeaderResponse {
        pub block: Header,
    }

    #[derive(Debug, Deserialize)]
    pub struct Header {
        pub height: u64,
    }

    #[derive(Debug, Serialize)]
    pub struct ExecuteScriptParams {
        #[serde(with = "base64_bytes")]
        pub script: Vec<u8>,
        #[serde(with = "base64_bytes_list")]
        pub arguments: Vec<Vec<u8>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ScriptResponse {
        #[serde(default, with = "base64_bytes")]
        pub value: Vec<u8>,
    }
}

// Legacy event blocks never carry a timestamp; it is always reported as 0.
impl From<wire::BlockEvents> for BlockEventsRecord {
    fn from(block: wire::BlockEvents) -> Self {
        BlockEventsRecord {
            block_id: block.block_id,
            height: block.block_height,
            timestamp: 0,
            events: block
                .events
                .into_iter()
                .map(|e| EventRecord {
                    event_type: e.event_type,
                    transaction_id: Identifier::from_hash(&e.transaction_id),
                    transaction_index: e.transaction_index,
                    event_index: e.event_index,
                    payload: e.payload,
                })
                .collect(),
        }
    }
}

impl From<wire::Block> for Block {
    fn from(block: wire::Block) -> Self {
        Block {
            id: block.id,
            height: block.height,
            timestamp: block.timestamp.map(|t| t.seconds).unwrap_or_default(),
            collection_ids: block
                .collection_guarantees
                .into_iter()
                .map(|g| g.collection_id)
                .collect(),
        }
    }
}

impl From<wire::TransactionResultResponse> for TransactionResult {
    fn from(res: wire::TransactionResultResponse) -> Self {
        TransactionResult {
            status: res.status,
            status_code: res.status_code,
            error_message: res.error_message,
            events: res
                .events
                .into_iter()
                .map(|e| TransactionEvent {
                    transaction_index: e.transaction_index,
                    event_index: e.event_index,
                    event_type: e.event_type,
                    payload: e.payload,
                })
                .collect(),
        }
    }
}

/// Connection to a node speaking the legacy protocol.
pub struct LegacyClient {
    conn: HttpConnection,
    config: ClientConfig,
}

impl LegacyClient {
    pub async fn connect(address: &str, config: ClientConfig) -> Result<Self> {
        let conn = HttpConnection::connect(address).await?;
        Ok(Self { conn, config })
    }

    pub async fn get_events_for_height_range(
        &mut self,
        event_type: &str,
        start_height: u64,
        end_height: u64,
    ) -> Result<Vec<BlockEventsRecord>> {
        let params = json!({
            "type": event_type,
            "start_height": start_height,
            "end_height": end_height,
        });
        let value = self
            .conn
            .call("legacy_access_getEventsForHeightRange", params, self.config.max_large_response_bytes)
            .await?;
        let res: wire::EventsResponse = decode(value)?;
        Ok(res.results.into_iter().map(Into::into).collect())
    }

    pub async fn get_block_by_height(&mut self, height: u64) -> Result<Block> {
        let value = self
            .conn
            .call("legacy_access_getBlockByHeight", json!({ "height": height }), self.config.max_response_bytes)
            .await?;
        let res: wire::BlockResponse = decode(value)?;
        Ok(res.block.into())
    }

    pub async fn get_collection_by_id(&mut self, id: &Identifier) -> Result<Collection> {
        let value = self
            .conn
            .call("legacy_access_getCollectionByID", json!({ "id": id }), self.config.max_response_bytes)
            .await?;
        let res: wire::CollectionResponse = decode(value)?;
        Ok(Collection {
            id: res.collection.id,
            transaction_ids: res.collection.transaction_ids,
        })
    }

    pub async fn get_transaction_result(&mut self, id: &Identifier) -> Result<TransactionResult> {
        let value = self
            .conn
            .call("legacy_access_getTransactionResult", json!({ "id": id }), self.config.max_large_response_bytes)
            .await?;
        let res: wire::TransactionResultResponse = decode(value)?;
        Ok(res.into())
    }

    pub async fn get_latest_block_header(&mut self) -> Result<u64> {
        let value = self
            .conn
            .call("legacy_access_getLatestBlockHeader", json!({ "is_sealed": true }), self.config.max_response_bytes)
            .await?;
        let res: wire::HeaderResponse = decode(value)?;
        Ok(res.block.height)
    }

    pub async fn execute_script(&mut self, script: &str, arguments: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        let params = serde_json::to_value(wire::ExecuteScriptParams {
            script: script.as_bytes().to_vec(),
            arguments,
        })?;
        let value = self
            .conn
            .call("legacy_access_executeScriptAtLatestBlock", params, self.config.max_response_bytes)
            .await?;
        let res: wire::ScriptResponse = decode(value)?;
        Ok(res.value)
    }

    pub async fn close(self) {
        self.conn.close().await;
    }
}
