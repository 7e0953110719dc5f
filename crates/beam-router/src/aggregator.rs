use beam_client::{ClientConfig, ProtocolClient};
use beam_common::{
    AggregateResult, Block, BlockEventsRecord, CallFailure, Collection, Counted, EventsFailure,
    Identifier, QueryRange, Result, TransactionResult,
};
use tracing::{debug, error};

use crate::directory::NodeDirectory;
use crate::epoch;
use crate::router::{self, Segment};

/// Answers queries by routing them to the access nodes of the directory.
///
/// The directory is loaded fresh for every operation. Range queries are split
/// into segments and executed one after another; point lookups go to the node
/// of the newest era. Every backend interaction uses its own connection.
///
/// # Call Counting
///
/// Results report how many backend calls were attempted. A segment counts as
/// a call as soon as it is attempted, whether or not the connection could be
/// opened.
#[derive(Clone)]
pub struct Aggregator {
    directory: NodeDirectory,
    client_config: ClientConfig,
}

impl Aggregator {
    pub fn new(directory: NodeDirectory) -> Self {
        Self {
            directory,
            client_config: ClientConfig::default(),
        }
    }

    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Collects all events of `event_type` in `range` across node boundaries.
    ///
    /// # Arguments
    /// * `event_type` - Fully qualified event type, passed to every backend as-is
    /// * `range` - Inclusive height range
    ///
    /// # Returns
    /// - `Ok(result)` - Blocks of every segment in ascending height order
    /// - `Err(failure)` - The blocks gathered before the failing segment, the
    ///   number of calls attempted (including the failed one) and the error
    ///
    /// # Behavior
    /// - Directory and coverage errors fail before any call (`api_calls == 0`)
    /// - Segments run sequentially; the first failure stops the query
    /// - No retries
    pub async fn collect_events(
        &self,
        event_type: &str,
        range: QueryRange,
    ) -> std::result::Result<AggregateResult, EventsFailure> {
        let nodes = self.directory.load()?;
        let segments = router::route(range, &nodes)?;
        debug!(
            event_type,
            range = %range,
            heights = range.height_count(),
            segments = segments.len(),
            "planned events query"
        );

        let mut result = AggregateResult::default();
        for segment in &segments {
            debug!(
                event_type,
                start = segment.start,
                end = segment.end,
                address = %segment.node.address,
                legacy = segment.node.is_legacy,
                "requesting events"
            );

            result.api_calls += 1;
            match self.fetch_segment(event_type, segment).await {
                Ok(blocks) => result.blocks.extend(blocks),
                Err(e) => {
                    error!(
                        start = segment.start,
                        end = segment.end,
                        address = %segment.node.address,
                        error = %e,
                        "failed to get events for height range"
                    );
                    return Err(EventsFailure::new(result, e));
                }
            }
        }

        Ok(result)
    }

    async fn fetch_segment(&self, event_type: &str, segment: &Segment) -> Result<Vec<BlockEventsRecord>> {
        let mut client = ProtocolClient::connect_with_config(&segment.node, self.client_config).await?;
        let blocks = client
            .get_events_for_height_range(event_type, segment.start, segment.end)
            .await;
        client.close().await;
        blocks
    }

    /// Height of the latest sealed block, from the newest-era node.
    pub async fn latest_block_height(&self) -> std::result::Result<Counted<u64>, CallFailure> {
        let mut client = self.connect_current().await?;
        let height = client.get_latest_block_header().await;
        client.close().await;
        counted("get latest block header", height)
    }

    pub async fn block_by_height(&self, height: u64) -> std::result::Result<Counted<Block>, CallFailure> {
        let mut client = self.connect_current().await?;
        let block = client.get_block_by_height(height).await;
        client.close().await;
        counted("get block by height", block)
    }

    pub async fn collection_by_id(&self, id: &Identifier) -> std::result::Result<Counted<Collection>, CallFailure> {
        let mut client = self.connect_current().await?;
        let collection = client.get_collection_by_id(id).await;
        client.close().await;
        counted("get collection by id", collection)
    }

    pub async fn transaction_result(
        &self,
        id: &Identifier,
    ) -> std::result::Result<Counted<TransactionResult>, CallFailure> {
        let mut client = self.connect_current().await?;
        let result = client.get_transaction_result(id).await;
        client.close().await;
        counted("get transaction result", result)
    }

    /// Executes a script against the newest-era node.
    ///
    /// `arguments` are already encoded; the raw result bytes are returned.
    pub async fn execute_script(
        &self,
        script: &str,
        arguments: Vec<Vec<u8>>,
    ) -> std::result::Result<Counted<Vec<u8>>, CallFailure> {
        let mut client = self.connect_current().await?;
        let value = client.execute_script(script, arguments).await;
        client.close().await;
        counted("execute script", value)
    }

    /// Loads the directory and connects to the newest-era node. Failures here
    /// happen before any call is issued.
    async fn connect_current(&self) -> std::result::Result<ProtocolClient, CallFailure> {
        let nodes = self.directory.load()?;
        let node = epoch::select_current(&nodes)?;
        debug!(address = %node.address, legacy = node.is_legacy, "using current era node");

        ProtocolClient::connect_with_config(&node, self.client_config)
            .await
            .map_err(|e| {
                error!(address = %node.address, error = %e, "failed to connect to access node");
                CallFailure::new(0, e)
            })
    }
}

fn counted<T>(operation: &str, result: Result<T>) -> std::result::Result<Counted<T>, CallFailure> {
    match result {
        Ok(value) => Ok(Counted::new(value, 1)),
        Err(e) => {
            error!(operation, error = %e, "access node call failed");
            Err(CallFailure::new(1, e))
        }
    }
}
