//! Beam Common Types and Transport
//!
//! This crate provides the shared data model, error taxonomy and HTTP transport
//! used by every other Beam crate.
//!
//! # Overview
//!
//! Beam is a routing and aggregation layer in front of a chain of
//! differently-versioned access nodes. Each node is authoritative for a
//! contiguous range of block heights; Beam splits a height-range query at the
//! coverage boundaries, talks to every node in the protocol generation it
//! understands, and stitches the partial answers back together.
//!
//! - **Protocol Layer**: domain records (events, blocks, collections), the
//!   backend JSON-RPC envelope and the [`BeamError`] taxonomy
//! - **Transport Layer**: a single owned HTTP/1.1 connection to one backend
//!
//! # Components
//!
//! - [`protocol`] - Domain types, JSON-RPC types, errors
//! - [`transport`] - Backend connections with per-call response size ceilings
//!
//! # Example
//!
//! ```
//! use beam_common::{Identifier, QueryRange};
//!
//! let range = QueryRange::new(50, 150).unwrap();
//! assert_eq!(range.height_count(), 101);
//!
//! let id = Identifier::from_hash(&[0xab; 4]);
//! assert!(id.to_string().starts_with("abababab0000"));
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
