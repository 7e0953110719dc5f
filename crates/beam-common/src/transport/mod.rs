//! Beam Transport Layer
//!
//! Backend access nodes are reached over plain HTTP/1.1 carrying JSON-RPC 2.0.
//! Each [`HttpConnection`] owns exactly one socket; callers open one per
//! backend interaction and close it when done.
//!
//! # Response Size Limits
//!
//! Every call names its own response ceiling. Ordinary calls use
//! [`DEFAULT_MAX_RESPONSE_BYTES`]; event range queries and transaction results
//! can be large and use [`LARGE_MAX_RESPONSE_BYTES`].

pub mod http;

pub use http::{HttpConnection, DEFAULT_MAX_RESPONSE_BYTES, LARGE_MAX_RESPONSE_BYTES};
