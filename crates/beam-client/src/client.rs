use beam_common::transport::{DEFAULT_MAX_RESPONSE_BYTES, LARGE_MAX_RESPONSE_BYTES};
use beam_common::{
    BeamError, Block, BlockEventsRecord, Collection, Identifier, NodeDescriptor, Result,
    TransactionResult,
};
use serde_json::Value;
use tracing::debug;

use crate::current::CurrentClient;
use crate::legacy::LegacyClient;

/// Per-call response size ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Ceiling for ordinary calls (default: 4 MiB)
    pub max_response_bytes: usize,
    /// Ceiling for event range queries and transaction results (default: 50 MiB)
    pub max_large_response_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            max_large_response_bytes: LARGE_MAX_RESPONSE_BYTES,
        }
    }
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| BeamError::InvalidResponse(format!("unexpected result shape: {}", e)))
}

/// A connected client for one access node, in the protocol generation the
/// node speaks.
///
/// The variant is chosen once from [`NodeDescriptor::is_legacy`]. The client
/// owns its connection until [`ProtocolClient::close`]; dropping it without
/// closing aborts the connection.
pub enum ProtocolClient {
    Current(CurrentClient),
    Legacy(LegacyClient),
}

impl ProtocolClient {
    pub async fn connect(descriptor: &NodeDescriptor) -> Result<Self> {
        Self::connect_with_config(descriptor, ClientConfig::default()).await
    }

    pub async fn connect_with_config(descriptor: &NodeDescriptor, config: ClientConfig) -> Result<Self> {
        debug!(
            address = %descriptor.address,
            legacy = descriptor.is_legacy,
            "connecting to access node"
        );

        if descriptor.is_legacy {
            Ok(ProtocolClient::Legacy(
                LegacyClient::connect(&descriptor.address, config).await?,
            ))
        } else {
            Ok(ProtocolClient::Current(
                CurrentClient::connect(&descriptor.address, config).await?,
            ))
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, ProtocolClient::Legacy(_))
    }

    /// Events of `event_type` for every block in `[start_height, end_height]`.
    pub async fn get_events_for_height_range(
        &mut self,
        event_type: &str,
        start_height: u64,
        end_height: u64,
    ) -> Result<Vec<BlockEventsRecord>> {
        match self {
            ProtocolClient::Current(c) => {
                c.get_events_for_height_range(event_type, start_height, end_height)
                    .await
            }
            ProtocolClient::Legacy(c) => {
                c.get_events_for_height_range(event_type, start_height, end_height)
                    .await
            }
        }
    }

    pub async fn get_block_by_height(&mut self, height: u64) -> Result<Block> {
        match self {
            ProtocolClient::Current(c) => c.get_block_by_height(height).await,
            ProtocolClient::Legacy(c) => c.get_block_by_height(height).await,
        }
    }

    pub async fn get_collection_by_id(&mut self, id: &Identifier) -> Result<Collection> {
        match self {
            ProtocolClient::Current(c) => c.get_collection_by_id(id).await,
            ProtocolClient::Legacy(c) => c.get_collection_by_id(id).await,
        }
    }

    pub async fn get_transaction_result(&mut self, id: &Identifier) -> Result<TransactionResult> {
        match self {
            ProtocolClient::Current(c) => c.get_transaction_result(id).await,
            ProtocolClient::Legacy(c) => c.get_transaction_result(id).await,
        }
    }

    /// Height of the latest sealed block.
    pub async fn get_latest_block_header(&mut self) -> Result<u64> {
        match self {
            ProtocolClient::Current(c) => c.get_latest_block_header().await,
            ProtocolClient::Legacy(c) => c.get_latest_block_header().await,
        }
    }

    /// Executes `script` at the latest block. Each argument is an already
    /// encoded value; the raw result bytes are returned unchanged.
    pub async fn execute_script(&mut self, script: &str, arguments: Vec<Vec<u8>>) -> Result<Vec<u8>> {
        match self {
            ProtocolClient::Current(c) => c.execute_script(script, arguments).await,
            ProtocolClient::Legacy(c) => c.execute_script(script, arguments).await,
        }
    }

    pub async fn close(self) {
        match self {
            ProtocolClient::Current(c) => c.close().await,
            ProtocolClient::Legacy(c) => c.close().await,
        }
    }
}
