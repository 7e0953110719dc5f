//! Beam: height-range routing and aggregation over versioned access nodes.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - [`common`] - domain records, errors and the backend HTTP transport
//! - [`client`] - per-generation access node clients
//! - [`router`] - node directory, range router, aggregator and HTTP server

pub use beam_client as client;
pub use beam_common as common;
pub use beam_router as router;

pub use beam_common::{AggregateResult, BeamError, NodeDescriptor, QueryRange};
pub use beam_router::{Aggregator, HttpServer, NodeDirectory};
