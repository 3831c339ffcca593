// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Capture proxy.
//
// Responsibilities:
// - Forward arbitrary methods/paths to the upstream origin via the
//   injected UpstreamClient trait
// - Health endpoint
// - Trace POST requests with JSON bodies into the record sink
// - Streaming tee: pass SSE bytes through as they arrive while
//   accumulating the same lines for the persisted record

use crate::record::TraceRecord;
use crate::storage::RecordSink;
use crate::upstream::{UpstreamBody, UpstreamClient, UpstreamError, UpstreamRequest};
use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use bytes::Bytes;
use futures_util::StreamExt;
use serde_json::{json, Value};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Request bodies larger than this are rejected; chat payloads are far
/// smaller in practice.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("failed to read request body: {0}")]
    BodyRead(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ProxyError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ProxyError::BodyRead(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        let body = Json(json!({
            "error": {
                "message": message,
                "type": "proxy_error",
            }
        }));
        (status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state injected into axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn UpstreamClient>,
    pub sink: Arc<dyn RecordSink>,
    /// Upstream base URL without a trailing slash.
    pub target: String,
}

impl AppState {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        sink: Arc<dyn RecordSink>,
        target: &str,
    ) -> Self {
        Self {
            upstream,
            sink,
            target: target.trim_end_matches('/').to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router construction
// ---------------------------------------------------------------------------

/// Build the axum router: a fixed health route plus a catch-all that
/// forwards everything else upstream.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(proxy_handler)
        .with_state(state)
}

/// Health endpoint: GET /health -> {"status":"ok"}
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

// ---------------------------------------------------------------------------
// Proxy handler
// ---------------------------------------------------------------------------

/// Forward a request to `<target><original path+query>`, tracing it when
/// it is a POST with a JSON body.
pub async fn proxy_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> axum::response::Response {
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = request.headers().clone();

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(uri.path());
    let url = format!("{}{}", state.target, path_and_query);

    let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => return ProxyError::BodyRead(e.to_string()).into_response(),
    };

    // Parse the body as JSON when possible; otherwise forward opaque bytes.
    let parsed: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    let is_stream = parsed
        .as_ref()
        .and_then(|v| v.get("stream"))
        .and_then(|s| s.as_bool())
        .unwrap_or(false);

    // Only POSTs with structured bodies look like LLM calls.
    let record = if method == Method::POST {
        parsed.as_ref().map(|v| TraceRecord::new(v.clone()))
    } else {
        None
    };

    if let Some(rec) = &record {
        tracing::info!(record_id = %rec.id, stream = is_stream, path = %uri.path(), "tracing LLM call");
    }

    let upstream_req = UpstreamRequest {
        method,
        url,
        headers: forwardable_headers(&headers),
        body,
        stream: is_stream,
    };

    if is_stream {
        handle_streaming(&state, upstream_req, record, started).await
    } else {
        handle_buffered(&state, upstream_req, record, started).await
    }
}

/// Strip hop-by-hop headers before forwarding. Content-Length is
/// recomputed by the client from the body.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        match name.as_str() {
            "host" | "connection" | "keep-alive" | "transfer-encoding" | "content-length" => {}
            _ => {
                out.append(name.clone(), value.clone());
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Non-streaming path
// ---------------------------------------------------------------------------

async fn handle_buffered(
    state: &AppState,
    upstream_req: UpstreamRequest,
    record: Option<TraceRecord>,
    started: Instant,
) -> axum::response::Response {
    let resp = match state.upstream.forward(upstream_req).await {
        Ok(r) => r,
        Err(e) => return fail_upstream(state, record, started, e).await,
    };

    let status = resp.status;
    let resp_headers = resp.headers;
    let body_bytes = match collect_body(resp.body).await {
        Ok(b) => b,
        Err(e) => return fail_upstream(state, record, started, e).await,
    };

    if let Some(mut rec) = record {
        rec.duration_ms = elapsed_ms(started);
        rec.response = Some(match serde_json::from_slice::<Value>(&body_bytes) {
            Ok(v) => v,
            // Non-JSON upstream bodies are recorded under a sentinel field.
            Err(_) => json!({"raw": String::from_utf8_lossy(&body_bytes)}),
        });
        append_record(state.sink.as_ref(), &rec).await;
    }

    let mut response = Response::builder().status(status);
    if let Some(h) = response.headers_mut() {
        *h = resp_headers;
    }
    response
        .body(Body::from(body_bytes))
        .unwrap()
        .into_response()
}

// ---------------------------------------------------------------------------
// Streaming path
// ---------------------------------------------------------------------------

async fn handle_streaming(
    state: &AppState,
    upstream_req: UpstreamRequest,
    record: Option<TraceRecord>,
    started: Instant,
) -> axum::response::Response {
    let resp = match state.upstream.forward(upstream_req).await {
        Ok(r) => r,
        Err(e) => return fail_upstream(state, record, started, e).await,
    };

    let status = resp.status;
    let mut upstream_body = into_byte_stream(resp.body);

    let (tx, rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(64);
    let sink = state.sink.clone();

    // Fan-out: the channel feeds the client, the splitter accumulates the
    // same bytes for the record. Forwarding never waits on parsing.
    tokio::spawn(async move {
        let mut splitter = LineSplitter::new();
        let mut error: Option<String> = None;

        while let Some(item) = upstream_body.next().await {
            match item {
                Ok(chunk) => {
                    splitter.push(&chunk);
                    if tx.send(Ok(chunk)).await.is_err() {
                        // Client went away. Keep draining so the persisted
                        // record still covers the full upstream response.
                        continue;
                    }
                }
                Err(e) => {
                    error = Some(e.to_string());
                    let body = json!({
                        "error": {"message": e.to_string(), "type": "proxy_error"}
                    });
                    let _ = tx.send(Ok(Bytes::from(format!("data: {body}\n\n")))).await;
                    break;
                }
            }
        }

        if let Some(mut rec) = record {
            rec.duration_ms = elapsed_ms(started);
            match error {
                Some(msg) => rec.error = Some(msg),
                None => {
                    rec.response = Some(json!({
                        "stream": true,
                        "sse_lines": splitter.finish(),
                    }));
                }
            }
            append_record(sink.as_ref(), &rec).await;
        }
    });

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .header(CONNECTION, "keep-alive")
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .unwrap()
        .into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Record the failure (if tracing) and surface a 502 to the client.
async fn fail_upstream(
    state: &AppState,
    record: Option<TraceRecord>,
    started: Instant,
    error: UpstreamError,
) -> axum::response::Response {
    if let Some(mut rec) = record {
        rec.duration_ms = elapsed_ms(started);
        rec.error = Some(error.to_string());
        append_record(state.sink.as_ref(), &rec).await;
    }
    ProxyError::Upstream(error.to_string()).into_response()
}

async fn append_record(sink: &dyn RecordSink, record: &TraceRecord) {
    if let Err(e) = sink.append(record).await {
        tracing::error!(record_id = %record.id, "failed to persist trace record: {e}");
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

async fn collect_body(body: UpstreamBody) -> Result<Bytes, UpstreamError> {
    match body {
        UpstreamBody::Full(b) => Ok(b),
        UpstreamBody::Stream(mut s) => {
            let mut collected = Vec::new();
            while let Some(chunk) = s.next().await {
                collected.extend_from_slice(&chunk?);
            }
            Ok(Bytes::from(collected))
        }
    }
}

fn into_byte_stream(
    body: UpstreamBody,
) -> Pin<Box<dyn futures_util::Stream<Item = Result<Bytes, UpstreamError>> + Send>> {
    match body {
        UpstreamBody::Full(bytes) => Box::pin(futures_util::stream::once(async move {
            Ok::<_, UpstreamError>(bytes)
        })),
        UpstreamBody::Stream(s) => s,
    }
}

/// Splits an incoming byte stream into SSE text lines while the raw bytes
/// are forwarded untouched. Carriage returns are stripped; a trailing
/// partial line is flushed at end of stream.
struct LineSplitter {
    buffer: String,
    lines: Vec<String>,
}

impl LineSplitter {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].trim_end_matches('\r').to_string();
            self.buffer.drain(..=pos);
            self.lines.push(line);
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.buffer.is_empty() {
            self.lines
                .push(self.buffer.trim_end_matches('\r').to_string());
        }
        self.lines
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
