use thiserror::Error;

use super::types::AggregateResult;

#[derive(Error, Debug)]
pub enum BeamError {
    /// The node directory could not be loaded. Fatal to the operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No access node descriptor covers the given height.
    #[error("No access node covers height {0}")]
    NoCoverage(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a JSON-RPC error object.
    #[error("Backend rejected call ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response body exceeded {0} bytes")]
    ResponseTooLarge(usize),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl BeamError {
    /// Returns `true` for failures that happened while talking to a backend.
    ///
    /// Configuration gaps (`Configuration`, `NoCoverage`) and malformed inbound
    /// input (`InvalidRequest`) are not backend errors.
    pub fn is_backend(&self) -> bool {
        !matches!(
            self,
            BeamError::Configuration(_) | BeamError::NoCoverage(_) | BeamError::InvalidRequest(_)
        )
    }
}

impl From<hex::FromHexError> for BeamError {
    fn from(err: hex::FromHexError) -> Self {
        BeamError::InvalidRequest(format!("invalid hex: {}", err))
    }
}

/// A failed range query together with everything gathered before the break.
///
/// `partial.api_calls` counts every backend round trip that was attempted,
/// including the one that failed.
#[derive(Error, Debug)]
#[error("events query failed after {} api calls", .partial.api_calls)]
pub struct EventsFailure {
    pub partial: AggregateResult,
    #[source]
    pub error: BeamError,
}

impl EventsFailure {
    pub fn new(partial: AggregateResult, error: BeamError) -> Self {
        Self { partial, error }
    }
}

impl From<BeamError> for EventsFailure {
    fn from(error: BeamError) -> Self {
        Self::new(AggregateResult::default(), error)
    }
}

/// A failed single-node operation and the number of calls it reached (0 or 1).
#[derive(Error, Debug)]
#[error("call failed after {api_calls} api calls")]
pub struct CallFailure {
    pub api_calls: u32,
    #[source]
    pub error: BeamError,
}

impl CallFailure {
    pub fn new(api_calls: u32, error: BeamError) -> Self {
        Self { api_calls, error }
    }
}

impl From<BeamError> for CallFailure {
    fn from(error: BeamError) -> Self {
        Self::new(0, error)
    }
}

pub type Result<T> = std::result::Result<T, BeamError>;
