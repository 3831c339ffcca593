// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Raw trace record — one captured request/response exchange.
//
// Created by the capture proxy exactly once per traced request and
// immutable thereafter. Persisted append-only as one JSON object per
// line; read back in bulk by the cook pipeline.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single captured LLM API exchange.
///
/// `request` and `response` are kept as opaque JSON: the proxy never
/// interprets them beyond the `stream` flag, and the cook pipeline owns
/// all protocol-specific parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    #[serde(default)]
    pub request: Value,
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub id: String,
    /// ISO-8601 UTC wall-clock instant of capture.
    #[serde(default)]
    pub timestamp: String,
}

impl TraceRecord {
    /// Create a fresh record for the given request body, stamped now.
    pub fn new(request: Value) -> Self {
        Self {
            request,
            response: None,
            error: None,
            duration_ms: 0,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }

    /// Whether the response was captured as a raw SSE stream.
    pub fn is_streamed(&self) -> bool {
        self.response
            .as_ref()
            .and_then(|r| r.get("stream"))
            .and_then(|s| s.as_bool())
            .unwrap_or(false)
    }

    /// The raw SSE lines of a streamed capture, if any.
    pub fn sse_lines(&self) -> Option<Vec<&str>> {
        self.response
            .as_ref()
            .and_then(|r| r.get("sse_lines"))
            .and_then(|l| l.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
    }
}
