// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Claude SSE decoder.
//
// Folds messages-API event chunks into one response value shaped like
// the non-streaming API:
// {"id", "model", "role": "assistant", "stop_reason", "content": [blocks]}

use super::data_payload;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// In-progress content block, keyed by the wire `index` field.
///
/// Text and thinking deltas share the text accumulator; the block stays
/// distinguishable by its declared `kind`. Tool input arrives as JSON
/// text fragments in `partial_input`.
#[derive(Debug, Default)]
struct BlockSlot {
    kind: String,
    text: String,
    name: String,
    tool_id: String,
    partial_input: String,
}

/// Fold a sequence of raw SSE lines into a Claude-shaped response.
///
/// Non-`data:` lines are ignored and chunks that fail to parse are
/// skipped. Blocks are emitted in ascending index order.
pub fn decode_claude_sse<S: AsRef<str>>(lines: &[S]) -> Value {
    let mut id: Option<String> = None;
    let mut model: Option<String> = None;
    let mut stop_reason: Option<String> = None;
    let mut blocks: BTreeMap<u64, BlockSlot> = BTreeMap::new();

    for line in lines {
        let Some(data) = data_payload(line.as_ref()) else {
            continue;
        };
        let Ok(chunk) = serde_json::from_str::<Value>(data) else {
            continue;
        };
        let event = chunk.get("type").and_then(|t| t.as_str()).unwrap_or("");

        match event {
            "message_start" => {
                let message = chunk.get("message");
                if id.is_none() {
                    id = message
                        .and_then(|m| m.get("id"))
                        .and_then(|v| v.as_str())
                        .map(String::from);
                }
                if model.is_none() {
                    model = message
                        .and_then(|m| m.get("model"))
                        .and_then(|v| v.as_str())
                        .map(String::from);
                }
            }
            "content_block_start" => {
                let index = chunk.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                let block = chunk.get("content_block");
                let slot = blocks.entry(index).or_default();
                slot.kind = block
                    .and_then(|b| b.get("type"))
                    .and_then(|t| t.as_str())
                    .unwrap_or("text")
                    .to_string();
                if let Some(name) = block.and_then(|b| b.get("name")).and_then(|v| v.as_str()) {
                    slot.name = name.to_string();
                }
                if let Some(tool_id) = block.and_then(|b| b.get("id")).and_then(|v| v.as_str()) {
                    slot.tool_id = tool_id.to_string();
                }
                // Some blocks carry initial text in the start event.
                if let Some(text) = block.and_then(|b| b.get("text")).and_then(|v| v.as_str()) {
                    slot.text.push_str(text);
                }
                if let Some(thinking) = block
                    .and_then(|b| b.get("thinking"))
                    .and_then(|v| v.as_str())
                {
                    slot.text.push_str(thinking);
                }
            }
            "content_block_delta" => {
                let index = chunk.get("index").and_then(|i| i.as_u64()).unwrap_or(0);
                let Some(delta) = chunk.get("delta") else {
                    continue;
                };
                let delta_type = delta.get("type").and_then(|t| t.as_str()).unwrap_or("");
                let slot = blocks.entry(index).or_default();
                match delta_type {
                    "text_delta" => {
                        if let Some(text) = delta.get("text").and_then(|v| v.as_str()) {
                            slot.text.push_str(text);
                        }
                    }
                    "thinking_delta" => {
                        if let Some(text) = delta.get("thinking").and_then(|v| v.as_str()) {
                            slot.text.push_str(text);
                        }
                    }
                    "input_json_delta" => {
                        if let Some(fragment) =
                            delta.get("partial_json").and_then(|v| v.as_str())
                        {
                            slot.partial_input.push_str(fragment);
                        }
                    }
                    _ => {}
                }
            }
            "message_delta" => {
                if let Some(reason) = chunk
                    .get("delta")
                    .and_then(|d| d.get("stop_reason"))
                    .and_then(|v| v.as_str())
                {
                    stop_reason = Some(reason.to_string());
                }
            }
            _ => {}
        }
    }

    let content: Vec<Value> = blocks.into_values().map(render_block).collect();

    json!({
        "id": id,
        "model": model,
        "role": "assistant",
        "stop_reason": stop_reason,
        "content": content,
    })
}

fn render_block(slot: BlockSlot) -> Value {
    match slot.kind.as_str() {
        "thinking" => json!({"type": "thinking", "thinking": slot.text}),
        "tool_use" => json!({
            "type": "tool_use",
            "id": slot.tool_id,
            "name": slot.name,
            "input": parse_tool_input(&slot.partial_input),
        }),
        // Text blocks, and anything with an unrecognized declared type,
        // keep their accumulated text verbatim.
        "text" => json!({"type": "text", "text": slot.text}),
        other => json!({"type": other, "text": slot.text}),
    }
}

/// Parse accumulated tool input JSON, falling back to a raw wrapper when
/// the fragments never formed a valid document.
fn parse_tool_input(accumulated: &str) -> Value {
    if accumulated.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_str(accumulated).unwrap_or_else(|_| json!({"raw": accumulated}))
}
