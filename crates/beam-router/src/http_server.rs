//! HTTP Server for Beam
//!
//! This module exposes the [`Aggregator`] over HTTP using axum. Every response
//! is JSON and reports how many backend calls were made (`ApiCalls`), also on
//! failure.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use beam_common::{BeamError, Block, CallFailure, Collection, Identifier, QueryRange, TransactionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::aggregator::Aggregator;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    api_calls: u32,
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct LatestBlockHeightResponse {
    latest_block_height: u64,
    api_calls: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BlockResponse {
    api_calls: u32,
    block: Block,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CollectionResponse {
    api_calls: u32,
    collection: Collection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransactionResultResponse {
    api_calls: u32,
    result: TransactionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteScriptResponse {
    result: Value,
    api_calls: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExecuteScriptBody {
    script: String,
    #[serde(default)]
    arguments: Vec<Value>,
}

type Params = Query<HashMap<String, String>>;

fn error_response(status: StatusCode, api_calls: u32, error: impl ToString) -> Response {
    let body = ErrorResponse {
        api_calls,
        error: error.to_string(),
    };
    (status, Json(body)).into_response()
}

fn bad_request(err: BeamError) -> Response {
    error_response(StatusCode::BAD_REQUEST, 0, err)
}

fn call_failed(failure: CallFailure) -> Response {
    let status = match failure.error {
        BeamError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, failure.api_calls, failure.error)
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, BeamError> {
    params
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| BeamError::InvalidRequest(format!("missing query parameter '{}'", name)))
}

fn height_param(params: &HashMap<String, String>, name: &str) -> Result<u64, BeamError> {
    let raw = required(params, name)?;
    raw.parse()
        .map_err(|_| BeamError::InvalidRequest(format!("'{}' is not a valid height: {}", name, raw)))
}

fn id_param(params: &HashMap<String, String>) -> Result<Identifier, BeamError> {
    Identifier::from_hex(required(params, "id")?)
}

fn events_request(params: &HashMap<String, String>) -> Result<(String, QueryRange), BeamError> {
    let start = height_param(params, "start")?;
    let end = height_param(params, "end")?;
    let event_type = required(params, "eventType")?.to_string();
    Ok((event_type, QueryRange::new(start, end)?))
}

/// Script results are JSON-encoded values; anything else is returned as base64.
fn script_result(bytes: Vec<u8>) -> Value {
    serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(STANDARD.encode(bytes)))
}

async fn handle_events(State(agg): State<Arc<Aggregator>>, Query(params): Params) -> Response {
    debug!(?params, "events request");

    let (event_type, range) = match events_request(&params) {
        Ok(request) => request,
        Err(e) => return bad_request(e),
    };

    match agg.collect_events(&event_type, range).await {
        Ok(result) => Json(result).into_response(),
        Err(failure) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            failure.partial.api_calls,
            failure.error,
        ),
    }
}

async fn handle_latest_block_height(State(agg): State<Arc<Aggregator>>) -> Response {
    debug!("latest block height request");

    match agg.latest_block_height().await {
        Ok(height) => Json(LatestBlockHeightResponse {
            latest_block_height: height.value,
            api_calls: height.api_calls,
        })
        .into_response(),
        Err(failure) => call_failed(failure),
    }
}

async fn handle_block(State(agg): State<Arc<Aggregator>>, Query(params): Params) -> Response {
    debug!(?params, "block request");

    let height = match height_param(&params, "height") {
        Ok(height) => height,
        Err(e) => return bad_request(e),
    };

    match agg.block_by_height(height).await {
        Ok(block) => Json(BlockResponse {
            api_calls: block.api_calls,
            block: block.value,
        })
        .into_response(),
        Err(failure) => call_failed(failure),
    }
}

async fn handle_collection(State(agg): State<Arc<Aggregator>>, Query(params): Params) -> Response {
    debug!(?params, "collection request");

    let id = match id_param(&params) {
        Ok(id) => id,
        Err(e) => return bad_request(e),
    };

    match agg.collection_by_id(&id).await {
        Ok(collection) => Json(CollectionResponse {
            api_calls: collection.api_calls,
            collection: collection.value,
        })
        .into_response(),
        Err(failure) => call_failed(failure),
    }
}

async fn handle_transaction_result(State(agg): State<Arc<Aggregator>>, Query(params): Params) -> Response {
    debug!(?params, "transaction result request");

    let id = match id_param(&params) {
        Ok(id) => id,
        Err(e) => return bad_request(e),
    };

    match agg.transaction_result(&id).await {
        Ok(result) => Json(TransactionResultResponse {
            api_calls: result.api_calls,
            result: result.value,
        })
        .into_response(),
        Err(failure) => call_failed(failure),
    }
}

async fn handle_execute_script(State(agg): State<Arc<Aggregator>>, body: axum::body::Bytes) -> Response {
    debug!(body = %String::from_utf8_lossy(&body), "execute script request");

    let body: ExecuteScriptBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => return bad_request(BeamError::InvalidRequest(format!("invalid script body: {}", e))),
    };

    let arguments = match body
        .arguments
        .iter()
        .map(serde_json::to_vec)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(arguments) => arguments,
        Err(e) => return bad_request(BeamError::InvalidRequest(format!("invalid script argument: {}", e))),
    };

    match agg.execute_script(&body.script, arguments).await {
        Ok(value) => Json(ExecuteScriptResponse {
            result: script_result(value.value),
            api_calls: value.api_calls,
        })
        .into_response(),
        Err(failure) => call_failed(failure),
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// HTTP server for Beam.
///
/// Routes:
/// - `GET /events?start=&end=&eventType=`
/// - `GET /latest-block-height`
/// - `POST /execute-script`
/// - `GET /block?height=`
/// - `GET /collection?id=`
/// - `GET /transaction-result?id=`
/// - `GET /__health`
pub struct HttpServer {
    aggregator: Arc<Aggregator>,
}

impl HttpServer {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }

    /// Builds the axum router with all routes and CORS support.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/events", get(handle_events))
            .route("/latest-block-height", get(handle_latest_block_height))
            .route("/execute-script", post(handle_execute_script))
            .route("/block", get(handle_block))
            .route("/collection", get(handle_collection))
            .route("/transaction-result", get(handle_transaction_result))
            .route("/__health", get(health_check))
            .layer(CorsLayer::permissive())
            .with_state(self.aggregator.clone())
    }

    /// Binds `addr` and serves until Ctrl-C.
    pub async fn run(self, addr: SocketAddr) -> Result<(), BeamError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BeamError::Transport(format!("Failed to bind to {}: {}", addr, e)))?;

        self.serve(listener, async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received Ctrl-C, shutting down");
            }
        })
        .await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), BeamError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        info!(
            "Beam HTTP server listening on {}",
            listener
                .local_addr()
                .map_err(|e| BeamError::Transport(format!("Failed to get local addr: {}", e)))?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| BeamError::Transport(format!("Server error: {}", e)))?;

        info!("Beam HTTP server stopped");
        Ok(())
    }
}
