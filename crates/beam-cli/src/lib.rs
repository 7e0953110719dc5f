// Copyright 2025 Beam Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Beam CLI
//!
//! Command-line interface for Beam.
//!
//! ## Key Commands
//!
//! - `beam serve`: Start the HTTP front end over the node directory
//! - `beam events`: Run one event range query (outputs raw JSON for scripting)
//! - `beam latest`: Print the latest sealed block height
//! - `beam nodes`: Print the node directory as loaded
//!
//! ## Configuration
//!
//! The node directory path comes from `--nodes` or `ACCESS_NODES`. The server
//! listens on `--bind`, else `0.0.0.0:$LISTEN_PORT`, else `0.0.0.0:8080`. Log
//! level comes from `RUST_LOG`, else `APP_LOG_LEVEL`, else `info`.

pub mod config;
