pub mod error;
pub mod jsonrpc;
pub mod types;


pub use error::{BeamError, CallFailure, EventsFailure, Result};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use types::{
    AggregateResult, Block, BlockEventsRecord, Collection, Counted, EventRecord, Identifier,
    NodeDescriptor, QueryRange, TransactionEvent, TransactionResult,
};
