//! Beam Router
//!
//! Routes height-range and point queries to the access nodes listed in the
//! node directory, and aggregates their answers.
//!
//! - [`directory`] - Node directory sources, reloaded for every operation
//! - [`router`] - Splits a height range into per-node segments
//! - [`epoch`] - Picks the newest-era node for point lookups
//! - [`aggregator`] - Executes plans against the backends and counts calls
//! - [`http_server`] - axum front end

pub mod aggregator;
pub mod directory;
pub mod epoch;
pub mod http_server;
pub mod router;

pub use aggregator::Aggregator;
pub use directory::{DirectorySource, FileSource, NodeDirectory, StaticSource};
pub use epoch::select_current;
pub use http_server::HttpServer;
pub use router::{locate, route, Segment};
