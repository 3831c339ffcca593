// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// OpenAI SSE decoder.
//
// Folds chat-completions delta chunks into one response value shaped
// like the non-streaming API:
// {"id", "model", "choices": [{"message": {...}}]}

use super::data_payload;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// In-progress tool call slot, keyed by the wire `index` field.
/// Arguments arrive as a partial JSON string split across chunks and
/// are concatenated, never overwritten.
#[derive(Debug, Default)]
struct ToolCallSlot {
    id: String,
    name: String,
    arguments: String,
}

/// Fold a sequence of raw SSE lines into an OpenAI-shaped response.
///
/// Non-`data:` lines and `data: [DONE]` are ignored; chunks that fail to
/// parse are skipped. The first non-null `id`/`model` win.
pub fn decode_openai_sse<S: AsRef<str>>(lines: &[S]) -> Value {
    let mut id: Option<String> = None;
    let mut model: Option<String> = None;
    let mut text = String::new();
    let mut slots: BTreeMap<u64, ToolCallSlot> = BTreeMap::new();

    for line in lines {
        let Some(data) = data_payload(line.as_ref()) else {
            continue;
        };
        if data.trim() == "[DONE]" {
            continue;
        }
        let Ok(chunk) = serde_json::from_str::<Value>(data) else {
            continue;
        };

        if id.is_none() {
            id = chunk.get("id").and_then(|v| v.as_str()).map(String::from);
        }
        if model.is_none() {
            model = chunk
                .get("model")
                .and_then(|v| v.as_str())
                .map(String::from);
        }

        let Some(delta) = chunk
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("delta"))
        else {
            continue;
        };

        if let Some(content) = delta.get("content").and_then(|v| v.as_str()) {
            text.push_str(content);
        }

        let Some(tool_calls) = delta.get("tool_calls").and_then(|tc| tc.as_array()) else {
            continue;
        };
        for tc in tool_calls {
            let index = tc.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
            let slot = slots.entry(index).or_default();
            if let Some(call_id) = tc.get("id").and_then(|v| v.as_str()) {
                slot.id = call_id.to_string();
            }
            if let Some(function) = tc.get("function") {
                if let Some(name) = function.get("name").and_then(|v| v.as_str()) {
                    slot.name = name.to_string();
                }
                if let Some(fragment) = function.get("arguments").and_then(|v| v.as_str()) {
                    slot.arguments.push_str(fragment);
                }
            }
        }
    }

    // Stable, deterministic ordering: sort completed tool calls by id.
    let mut calls: Vec<ToolCallSlot> = slots.into_values().collect();
    calls.sort_by(|a, b| a.id.cmp(&b.id));

    let mut message = json!({
        "role": "assistant",
        "content": text,
    });
    if !calls.is_empty() {
        let wire_calls: Vec<Value> = calls
            .into_iter()
            .map(|c| {
                json!({
                    "id": c.id,
                    "type": "function",
                    "function": {"name": c.name, "arguments": c.arguments},
                })
            })
            .collect();
        message["tool_calls"] = Value::Array(wire_calls);
    }

    json!({
        "id": id,
        "model": model,
        "choices": [{"message": message}],
    })
}
