// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Wire-format detection.
//
// Raw records carry no protocol marker, so the cook pipeline classifies
// each one from its shape. Detection order, first match wins:
//   1. streamed SSE capture: probe decoded data chunks for Claude event
//      names or an OpenAI `choices` field
//   2. list-valued `system` field
//   3. first tool definition has `input_schema`
//   4. array-typed message content with a Claude block type
//   5. default: openai

use crate::record::TraceRecord;
use crate::sse::data_payload;
use serde_json::Value;

/// The two chat wire formats the cooker understands.
///
/// This is not a vendor enum: `OpenAi` covers any OpenAI-compatible chat
/// completions API, `Claude` covers the Anthropic-style messages API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    OpenAi,
    Claude,
}

/// Caller override for format selection. `Auto` means detect per record;
/// the other variants skip detection entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatChoice {
    Auto,
    #[value(name = "openai")]
    OpenAi,
    Claude,
}

impl FormatChoice {
    pub fn resolve(self, record: &TraceRecord) -> ApiFormat {
        match self {
            FormatChoice::Auto => detect_format(record),
            FormatChoice::OpenAi => ApiFormat::OpenAi,
            FormatChoice::Claude => ApiFormat::Claude,
        }
    }
}

const CLAUDE_EVENTS: &[&str] = &[
    "message_start",
    "content_block_start",
    "content_block_delta",
    "message_delta",
    "message_stop",
];

/// Classify one raw record as `openai` or `claude`.
pub fn detect_format(record: &TraceRecord) -> ApiFormat {
    // 1. Streamed captures: the SSE chunks themselves are the strongest
    //    signal. No signal in any line falls through to the request shape.
    if record.is_streamed() {
        if let Some(lines) = record.sse_lines() {
            if let Some(format) = probe_sse_lines(&lines) {
                return format;
            }
        }
    }

    let request = &record.request;

    // 2. Claude requests carry `system` as a list of blocks.
    if request.get("system").map(Value::is_array) == Some(true) {
        return ApiFormat::Claude;
    }

    // 3. Claude tool definitions use `input_schema`, not `parameters`.
    if let Some(first_tool) = request
        .get("tools")
        .and_then(|t| t.as_array())
        .and_then(|t| t.first())
    {
        if first_tool.get("input_schema").is_some() {
            return ApiFormat::Claude;
        }
    }

    // 4. Array-typed message content with Claude block types.
    if let Some(messages) = request.get("messages").and_then(|m| m.as_array()) {
        for msg in messages {
            let Some(blocks) = msg.get("content").and_then(|c| c.as_array()) else {
                continue;
            };
            for block in blocks {
                if let Some(block_type) = block.get("type").and_then(|t| t.as_str()) {
                    if matches!(block_type, "tool_use" | "tool_result" | "thinking") {
                        return ApiFormat::Claude;
                    }
                }
            }
        }
    }

    ApiFormat::OpenAi
}

fn probe_sse_lines(lines: &[&str]) -> Option<ApiFormat> {
    for line in lines {
        let Some(data) = data_payload(line) else {
            continue;
        };
        let Ok(chunk) = serde_json::from_str::<Value>(data) else {
            continue;
        };
        if let Some(event) = chunk.get("type").and_then(|t| t.as_str()) {
            if CLAUDE_EVENTS.contains(&event) {
                return Some(ApiFormat::Claude);
            }
        }
        if chunk.get("choices").is_some() {
            return Some(ApiFormat::OpenAi);
        }
    }
    None
}
