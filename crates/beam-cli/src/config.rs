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

//! Resolution of CLI flags against environment variables.
//!
//! Functions here take the environment values as arguments so they can be
//! tested without touching the process environment.

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable naming the node directory file.
pub const NODES_ENV: &str = "ACCESS_NODES";
/// Environment variable holding the listen port.
pub const PORT_ENV: &str = "LISTEN_PORT";
/// Environment variable holding the log level (`DEBUG|INFO|WARN|ERROR`).
pub const LOG_LEVEL_ENV: &str = "APP_LOG_LEVEL";

pub const DEFAULT_PORT: u16 = 8080;

/// Node directory path: the flag wins over the environment.
pub fn nodes_path(flag: Option<String>, env: Option<String>) -> Result<PathBuf> {
    flag.or(env)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("no node directory given: use --nodes or set {}", NODES_ENV))
}

/// Listen address: `--bind`, else `0.0.0.0:<port>`, else `0.0.0.0:8080`.
pub fn bind_addr(flag: Option<String>, port_env: Option<String>) -> Result<SocketAddr> {
    if let Some(bind) = flag {
        return bind
            .parse()
            .map_err(|e| anyhow!("Invalid bind address {}: {}", bind, e));
    }

    let port = match port_env.filter(|p| !p.is_empty()) {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| anyhow!("Invalid {} {}: {}", PORT_ENV, port, e))?,
        None => DEFAULT_PORT,
    };

    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Filter directive from `APP_LOG_LEVEL`; unknown or missing values mean `info`.
pub fn log_level(app_log_level: Option<&str>) -> &'static str {
    match app_log_level.map(str::to_ascii_uppercase).as_deref() {
        Some("DEBUG") => "debug",
        Some("WARN") => "warn",
        Some("ERROR") => "error",
        _ => "info",
    }
}
