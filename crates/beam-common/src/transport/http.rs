//! HTTP Backend Connection
//!
//! A single owned HTTP/1.1 connection to one access node. The connection is
//! opened with hyper's low-level client handshake; the connection driver runs
//! on a spawned task that is joined by [`HttpConnection::close`] and aborted if
//! the connection is dropped without being closed.
//!
//! Every call POSTs a JSON-RPC 2.0 request to `/` and reads the response body
//! through [`Limited`], so an oversized backend answer fails with
//! [`BeamError::ResponseTooLarge`] instead of being buffered whole.
//!
//! # Example
//!
//! ```no_run
//! use beam_common::transport::{HttpConnection, DEFAULT_MAX_RESPONSE_BYTES};
//! use serde_json::json;
//!
//! # async fn run() -> beam_common::Result<()> {
//! let mut conn = HttpConnection::connect("127.0.0.1:9000").await?;
//! let header = conn
//!     .call("access_getLatestBlockHeader", json!({"isSealed": true}), DEFAULT_MAX_RESPONSE_BYTES)
//!     .await?;
//! conn.close().await;
//! # Ok(())
//! # }
//! ```

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::client::conn::http1::{self, SendRequest};
use hyper::header::{CONTENT_TYPE, HOST};
use hyper::{Method, Request};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::protocol::error::{BeamError, Result};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Response ceiling for ordinary backend calls (4 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Response ceiling for event range queries and transaction results (50 MiB).
pub const LARGE_MAX_RESPONSE_BYTES: usize = 50 * 1024 * 1024;

/// Connection driver task, aborted on drop.
struct ConnectionTask(Option<JoinHandle<()>>);

impl ConnectionTask {
    async fn join(mut self) {
        if let Some(handle) = self.0.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ConnectionTask {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

/// One open HTTP/1.1 connection to a backend access node.
pub struct HttpConnection {
    address: String,
    sender: SendRequest<Full<Bytes>>,
    task: ConnectionTask,
    next_id: u64,
}

impl HttpConnection {
    /// Opens a TCP connection to `address` (`host:port`) and performs the
    /// HTTP/1.1 handshake.
    pub async fn connect(address: &str) -> Result<Self> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| BeamError::Connection(format!("failed to connect to {}: {}", address, e)))?;

        let io = TokioIo::new(stream);
        let (sender, conn) = http1::handshake(io)
            .await
            .map_err(|e| BeamError::Connection(format!("handshake with {} failed: {}", address, e)))?;

        let peer = address.to_string();
        let handle = tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(address = %peer, error = %e, "backend connection closed with error");
            }
        });

        Ok(Self {
            address: address.to_string(),
            sender,
            task: ConnectionTask(Some(handle)),
            next_id: 1,
        })
    }

    /// Sends one JSON-RPC call and returns its `result` value.
    ///
    /// The response body may be at most `max_response_bytes` long.
    pub async fn call(&mut self, method: &str, params: Value, max_response_bytes: usize) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest::new(method, params, json!(id));
        let body = serde_json::to_vec(&request)?;

        let http_request = Request::builder()
            .method(Method::POST)
            .uri("/")
            .header(HOST, self.address.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| BeamError::Transport(format!("failed to build request: {}", e)))?;

        self.sender
            .ready()
            .await
            .map_err(|e| BeamError::Connection(format!("connection to {} unavailable: {}", self.address, e)))?;

        trace!(address = %self.address, method, id, "sending backend request");

        let response = self
            .sender
            .send_request(http_request)
            .await
            .map_err(|e| BeamError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body_bytes = Limited::new(response.into_body(), max_response_bytes)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    BeamError::ResponseTooLarge(max_response_bytes)
                } else {
                    BeamError::Transport(format!("failed to read response: {}", e))
                }
            })?
            .to_bytes();

        if !status.is_success() {
            return Err(BeamError::Transport(format!(
                "backend {} answered HTTP {}: {}",
                self.address,
                status,
                String::from_utf8_lossy(&body_bytes)
            )));
        }

        let response: JsonRpcResponse = serde_json::from_slice(&body_bytes)
            .map_err(|e| BeamError::InvalidResponse(format!("malformed JSON-RPC response: {}", e)))?;

        response.into_result()
    }

    /// Closes the connection and waits for the driver task to finish.
    pub async fn close(self) {
        let HttpConnection { sender, task, .. } = self;
        drop(sender);
        task.join().await;
    }
}
