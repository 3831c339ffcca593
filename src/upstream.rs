// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Upstream HTTP client abstraction.
//
// The proxy never talks to the network directly: it goes through the
// injected UpstreamClient, so tests can swap in mocks and the real
// implementation owns the shared reqwest connection pool.

use async_trait::async_trait;
use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::TryStreamExt;
use std::pin::Pin;
use std::time::Duration;

/// Generation can take minutes on large prompts; the pool-wide timeout
/// has to accommodate the slowest models.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(300);

/// Request data forwarded to the upstream origin.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Whether the response body should be exposed as a stream.
    pub stream: bool,
}

/// Response body: buffered whole, or an incremental byte stream.
pub enum UpstreamBody {
    Full(Bytes),
    Stream(Pin<Box<dyn Stream<Item = Result<Bytes, UpstreamError>> + Send>>),
}

pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: UpstreamBody,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream request timed out: {0}")]
    Timeout(String),
}

/// Abstraction over the HTTP client that forwards requests to the
/// upstream provider.
///
/// Implementations must be Send + Sync so they can be shared across
/// request handlers via `Arc`.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// Real upstream client backed by a shared reqwest connection pool.
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new() -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let resp = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(e.to_string())
                } else {
                    UpstreamError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        let headers = resp.headers().clone();

        if request.stream {
            let stream = resp
                .bytes_stream()
                .map_err(|e| UpstreamError::Transport(e.to_string()));
            Ok(UpstreamResponse {
                status,
                headers,
                body: UpstreamBody::Stream(Box::pin(stream)),
            })
        } else {
            let body = resp
                .bytes()
                .await
                .map_err(|e| UpstreamError::Transport(e.to_string()))?;
            Ok(UpstreamResponse {
                status,
                headers,
                body: UpstreamBody::Full(body),
            })
        }
    }
}
