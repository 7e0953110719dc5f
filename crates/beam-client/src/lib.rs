//! Beam Access Node Clients
//!
//! One client per backend protocol generation, behind the [`ProtocolClient`]
//! enum. Both generations translate their wire records into the common
//! `beam_common` domain types.

pub mod client;
pub mod current;
pub mod legacy;

pub use client::{ClientConfig, ProtocolClient};
pub use current::CurrentClient;
pub use legacy::LegacyClient;
