// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Content normalization.
//
// Two protocol pipelines converge on one message shape. Each pipeline
// walks the raw request/response bodies and emits ordered message
// tuples plus tool definitions; the dedup store assigns ids afterward.
//
// Role mapping is uniform: `assistant` with tool calls becomes
// `tool_use`, `tool` becomes `tool_result`, everything else passes
// through. Unrecognized wire roles degrade to `user` rather than
// failing the record.

use super::dedup::ToolDef;
use super::types::{Role, ToolCallEntry};
use crate::detect::ApiFormat;
use crate::sse::{decode_claude_sse, decode_openai_sse};
use serde_json::{json, Value};

/// A message after protocol normalization, before interning.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMessage {
    pub role: Role,
    pub content: String,
    pub tool_calls: Option<Vec<ToolCallEntry>>,
    pub tool_use_id: Option<String>,
    pub is_error: Option<bool>,
}

impl NormalizedMessage {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_use_id: None,
            is_error: None,
        }
    }

    fn tool_use(calls: Vec<ToolCallEntry>) -> Self {
        Self {
            role: Role::ToolUse,
            content: String::new(),
            tool_calls: Some(calls),
            tool_use_id: None,
            is_error: None,
        }
    }
}

impl ApiFormat {
    /// Walk the raw request body and emit its messages in order.
    pub fn request_messages(self, request: &Value) -> Vec<NormalizedMessage> {
        match self {
            ApiFormat::OpenAi => openai_request_messages(request),
            ApiFormat::Claude => claude_request_messages(request),
        }
    }

    /// Normalize the response side of one record. Always emits at least
    /// one message, even for errors and empty responses.
    pub fn response_messages(
        self,
        response: Option<&Value>,
        error: Option<&str>,
    ) -> Vec<NormalizedMessage> {
        if let Some(err) = error {
            return vec![NormalizedMessage::text(
                Role::Assistant,
                format!("Error: {err}"),
            )];
        }
        let Some(response) = response else {
            return vec![NormalizedMessage::text(Role::Assistant, "")];
        };
        let decoded = decode_if_streamed(self, response);
        let body = decoded.as_ref().unwrap_or(response);
        match self {
            ApiFormat::OpenAi => openai_response_messages(body),
            ApiFormat::Claude => claude_response_messages(body),
        }
    }

    /// Extract tool definitions from the raw request body.
    pub fn tools(self, request: &Value) -> Vec<ToolDef> {
        let Some(tools) = request.get("tools").and_then(|t| t.as_array()) else {
            return Vec::new();
        };
        match self {
            ApiFormat::OpenAi => tools
                .iter()
                .filter(|t| t.get("type").and_then(|v| v.as_str()) == Some("function"))
                .filter_map(|t| t.get("function"))
                .map(|f| ToolDef {
                    name: str_field(f, "name"),
                    description: str_field(f, "description"),
                    parameters: f.get("parameters").cloned().unwrap_or_else(|| json!({})),
                })
                .collect(),
            ApiFormat::Claude => tools
                .iter()
                .map(|t| ToolDef {
                    name: str_field(t, "name"),
                    description: str_field(t, "description"),
                    parameters: t.get("input_schema").cloned().unwrap_or_else(|| json!({})),
                })
                .collect(),
        }
    }
}

fn decode_if_streamed(format: ApiFormat, response: &Value) -> Option<Value> {
    if response.get("stream").and_then(|s| s.as_bool()) != Some(true) {
        return None;
    }
    let lines: Vec<&str> = response
        .get("sse_lines")?
        .as_array()?
        .iter()
        .filter_map(|l| l.as_str())
        .collect();
    Some(match format {
        ApiFormat::OpenAi => decode_openai_sse(&lines),
        ApiFormat::Claude => decode_claude_sse(&lines),
    })
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn map_role(wire: &str, has_calls: bool) -> Role {
    match wire {
        "assistant" if has_calls => Role::ToolUse,
        "assistant" => Role::Assistant,
        "system" => Role::System,
        "user" => Role::User,
        "tool" | "tool_result" => Role::ToolResult,
        "tool_use" => Role::ToolUse,
        "thinking" => Role::Thinking,
        _ => Role::User,
    }
}

// ---------------------------------------------------------------------------
// OpenAI pipeline
// ---------------------------------------------------------------------------

fn openai_request_messages(request: &Value) -> Vec<NormalizedMessage> {
    let Some(messages) = request.get("messages").and_then(|m| m.as_array()) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for msg in messages {
        let wire_role = msg.get("role").and_then(|r| r.as_str()).unwrap_or("");
        let tool_calls = parse_openai_tool_calls(msg.get("tool_calls"));
        let tool_use_id = if wire_role == "tool" {
            msg.get("tool_call_id")
                .and_then(|v| v.as_str())
                .map(String::from)
        } else {
            None
        };

        match msg.get("content") {
            Some(Value::Array(blocks)) => {
                // Each content item becomes its own message; a tool_calls
                // list rides on one trailing message of its own.
                for block in blocks {
                    let mut item =
                        NormalizedMessage::text(map_role(wire_role, false), render_openai_block(block));
                    item.tool_use_id = tool_use_id.clone();
                    out.push(item);
                }
                if let Some(calls) = tool_calls {
                    out.push(NormalizedMessage::tool_use(calls));
                }
            }
            content => {
                let text = content.and_then(|c| c.as_str()).unwrap_or("").to_string();
                let has_calls = tool_calls.is_some();
                out.push(NormalizedMessage {
                    role: map_role(wire_role, has_calls),
                    content: text,
                    tool_calls,
                    tool_use_id,
                    is_error: None,
                });
            }
        }
    }
    out
}

fn render_openai_block(block: &Value) -> String {
    match block.get("type").and_then(|t| t.as_str()) {
        Some("text") => str_field(block, "text"),
        Some("image_url") => {
            let url = block
                .get("image_url")
                .and_then(|i| i.get("url"))
                .and_then(|u| u.as_str())
                .unwrap_or("");
            if url.starts_with("data:") {
                "[image: base64 data]".to_string()
            } else {
                format!("[image: {url}]")
            }
        }
        _ => block.to_string(),
    }
}

fn parse_openai_tool_calls(raw: Option<&Value>) -> Option<Vec<ToolCallEntry>> {
    let calls = raw?.as_array()?;
    if calls.is_empty() {
        return None;
    }
    let parsed = calls
        .iter()
        .map(|tc| {
            let id = tc.get("id").and_then(|v| v.as_str()).map(String::from);
            if let Some(function) = tc.get("function").filter(|f| f.is_object()) {
                ToolCallEntry {
                    name: str_field(function, "name"),
                    arguments: parse_arguments(function.get("arguments")),
                    id,
                }
            } else {
                ToolCallEntry {
                    name: str_field(tc, "name"),
                    arguments: parse_arguments(tc.get("arguments")),
                    id,
                }
            }
        })
        .collect();
    Some(parsed)
}

/// Arguments arrive as a JSON string on the wire; keep unparseable text
/// under a raw wrapper instead of dropping it.
fn parse_arguments(raw: Option<&Value>) -> Value {
    match raw {
        Some(Value::String(s)) => {
            serde_json::from_str(s).unwrap_or_else(|_| json!({"raw": s}))
        }
        Some(other) => other.clone(),
        None => json!({}),
    }
}

fn openai_response_messages(response: &Value) -> Vec<NormalizedMessage> {
    let Some(message) = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
    else {
        return vec![NormalizedMessage::text(Role::Assistant, "")];
    };
    let wire_role = message
        .get("role")
        .and_then(|r| r.as_str())
        .unwrap_or("assistant");
    let tool_calls = parse_openai_tool_calls(message.get("tool_calls"));
    let content = message
        .get("content")
        .and_then(|c| c.as_str())
        .unwrap_or("")
        .to_string();
    vec![NormalizedMessage {
        role: map_role(wire_role, tool_calls.is_some()),
        content,
        tool_calls,
        tool_use_id: None,
        is_error: None,
    }]
}

// ---------------------------------------------------------------------------
// Claude pipeline
// ---------------------------------------------------------------------------

fn claude_request_messages(request: &Value) -> Vec<NormalizedMessage> {
    let mut out = Vec::new();

    match request.get("system") {
        Some(Value::String(text)) => {
            out.push(NormalizedMessage::text(Role::System, text.clone()));
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                match entry {
                    Value::String(text) => {
                        out.push(NormalizedMessage::text(Role::System, text.clone()))
                    }
                    block if block.get("type").and_then(|t| t.as_str()) == Some("text") => {
                        out.push(NormalizedMessage::text(Role::System, str_field(block, "text")))
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }

    let Some(messages) = request.get("messages").and_then(|m| m.as_array()) else {
        return out;
    };
    for msg in messages {
        let wire_role = msg.get("role").and_then(|r| r.as_str()).unwrap_or("");
        match msg.get("content") {
            Some(Value::Array(blocks)) => {
                expand_claude_blocks(wire_role, blocks, &mut out);
            }
            content => {
                let text = content.and_then(|c| c.as_str()).unwrap_or("").to_string();
                out.push(NormalizedMessage::text(map_role(wire_role, false), text));
            }
        }
    }
    out
}

/// Expand one list-valued message block by block. Tool-use blocks are
/// collected across the whole list and emitted as a single trailing
/// tool_use message.
fn expand_claude_blocks(wire_role: &str, blocks: &[Value], out: &mut Vec<NormalizedMessage>) {
    let mut pending_calls: Vec<ToolCallEntry> = Vec::new();
    for block in blocks {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                out.push(NormalizedMessage::text(
                    map_role(wire_role, false),
                    str_field(block, "text"),
                ));
            }
            Some("thinking") => {
                let text = str_field(block, "thinking");
                if !text.is_empty() {
                    out.push(NormalizedMessage::text(Role::Thinking, text));
                }
            }
            Some("tool_use") => {
                pending_calls.push(ToolCallEntry {
                    name: str_field(block, "name"),
                    arguments: block.get("input").cloned().unwrap_or_else(|| json!({})),
                    id: block.get("id").and_then(|v| v.as_str()).map(String::from),
                });
            }
            Some("tool_result") => {
                out.push(NormalizedMessage {
                    role: Role::ToolResult,
                    content: flatten_result_content(block.get("content")),
                    tool_calls: None,
                    tool_use_id: block
                        .get("tool_use_id")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    is_error: block.get("is_error").and_then(|v| v.as_bool()),
                });
            }
            Some("image") => {
                out.push(NormalizedMessage::text(map_role(wire_role, false), "[image]"));
            }
            _ => {
                out.push(NormalizedMessage::text(
                    map_role(wire_role, false),
                    block.to_string(),
                ));
            }
        }
    }
    if !pending_calls.is_empty() {
        out.push(NormalizedMessage::tool_use(pending_calls));
    }
}

/// Tool results carry either a string or a list of blocks; flatten the
/// list by joining each sub-block's text (or its serialization).
fn flatten_result_content(content: Option<&Value>) -> String {
    match content {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| match part.get("text").and_then(|t| t.as_str()) {
                Some(text) => text.to_string(),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn claude_response_messages(response: &Value) -> Vec<NormalizedMessage> {
    let mut out = Vec::new();
    let mut text = String::new();
    let mut calls: Vec<ToolCallEntry> = Vec::new();

    if let Some(blocks) = response.get("content").and_then(|c| c.as_array()) {
        for block in blocks {
            match block.get("type").and_then(|t| t.as_str()) {
                Some("thinking") => {
                    out.push(NormalizedMessage::text(
                        Role::Thinking,
                        str_field(block, "thinking"),
                    ));
                }
                Some("text") => text.push_str(&str_field(block, "text")),
                Some("tool_use") => {
                    calls.push(ToolCallEntry {
                        name: str_field(block, "name"),
                        arguments: block.get("input").cloned().unwrap_or_else(|| json!({})),
                        id: block.get("id").and_then(|v| v.as_str()).map(String::from),
                    });
                }
                _ => {}
            }
        }
    }

    let role = if calls.is_empty() {
        Role::Assistant
    } else {
        Role::ToolUse
    };
    out.push(NormalizedMessage {
        role,
        content: text,
        tool_calls: (!calls.is_empty()).then_some(calls),
        tool_use_id: None,
        is_error: None,
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- OpenAI request side ------------------------------------------------

    #[test]
    fn string_content_yields_one_message_per_entry() {
        let request = json!({
            "messages": [
                {"role": "system", "content": "be terse"},
                {"role": "user", "content": "hi"},
            ],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[1].role, Role::User);
        assert_eq!(msgs[1].content, "hi");
    }

    #[test]
    fn list_content_expands_per_element_with_image_placeholders() {
        let request = json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "what is this"},
                    {"type": "image_url", "image_url": {"url": "https://x.test/cat.png"}},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
                ],
            }],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].content, "what is this");
        assert_eq!(msgs[1].content, "[image: https://x.test/cat.png]");
        assert_eq!(msgs[2].content, "[image: base64 data]");
    }

    #[test]
    fn assistant_with_tool_calls_maps_to_tool_use_role() {
        let request = json!({
            "messages": [{
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "function": {"name": "read_file", "arguments": "{\"path\":\"/tmp\"}"},
                }],
            }],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::ToolUse);
        assert_eq!(msgs[0].content, "");
        let calls = msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].name, "read_file");
        assert_eq!(calls[0].arguments, json!({"path": "/tmp"}));
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
    }

    #[test]
    fn unparseable_arguments_kept_under_raw() {
        let request = json!({
            "messages": [{
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "f", "arguments": "{broken"}}],
            }],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        let calls = msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].arguments, json!({"raw": "{broken"}));
    }

    #[test]
    fn tool_role_becomes_tool_result_with_tool_use_id() {
        let request = json!({
            "messages": [{"role": "tool", "tool_call_id": "call_1", "content": "42"}],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        assert_eq!(msgs[0].role, Role::ToolResult);
        assert_eq!(msgs[0].tool_use_id.as_deref(), Some("call_1"));
        assert_eq!(msgs[0].content, "42");
    }

    #[test]
    fn list_content_with_tool_calls_appends_trailing_tool_use_message() {
        let request = json!({
            "messages": [{
                "role": "assistant",
                "content": [{"type": "text", "text": "on it"}],
                "tool_calls": [{"id": "call_2", "function": {"name": "f", "arguments": "{}"}}],
            }],
        });
        let msgs = ApiFormat::OpenAi.request_messages(&request);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::Assistant);
        assert_eq!(msgs[0].content, "on it");
        assert_eq!(msgs[1].role, Role::ToolUse);
        assert!(msgs[1].tool_calls.is_some());
    }

    // -- OpenAI response side -----------------------------------------------

    #[test]
    fn error_yields_one_assistant_error_message() {
        let msgs = ApiFormat::OpenAi.response_messages(None, Some("connection refused"));
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::Assistant);
        assert_eq!(msgs[0].content, "Error: connection refused");
    }

    #[test]
    fn missing_response_yields_one_empty_assistant_message() {
        let msgs = ApiFormat::OpenAi.response_messages(None, None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "");
    }

    #[test]
    fn buffered_response_takes_first_choice_message() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}],
        });
        let msgs = ApiFormat::OpenAi.response_messages(Some(&response), None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::Assistant);
        assert_eq!(msgs[0].content, "hello");
    }

    #[test]
    fn streamed_response_is_decoded_before_normalizing() {
        let response = json!({
            "stream": true,
            "sse_lines": [
                r#"data: {"id":"c1","choices":[{"delta":{"content":"Hel"}}]}"#,
                r#"data: {"choices":[{"delta":{"content":"lo"}}]}"#,
                "data: [DONE]",
            ],
        });
        let msgs = ApiFormat::OpenAi.response_messages(Some(&response), None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "Hello");
    }

    // -- Claude request side ------------------------------------------------

    #[test]
    fn system_entries_precede_messages() {
        let request = json!({
            "system": [
                {"type": "text", "text": "rule one"},
                "rule two",
            ],
            "messages": [{"role": "user", "content": "hi"}],
        });
        let msgs = ApiFormat::Claude.request_messages(&request);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[0].content, "rule one");
        assert_eq!(msgs[1].content, "rule two");
        assert_eq!(msgs[2].role, Role::User);
    }

    #[test]
    fn tool_use_blocks_collapse_into_one_trailing_message() {
        let request = json!({
            "messages": [{
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "checking"},
                    {"type": "tool_use", "id": "toolu_1", "name": "read", "input": {"p": 1}},
                    {"type": "tool_use", "id": "toolu_2", "name": "grep", "input": {"q": 2}},
                ],
            }],
        });
        let msgs = ApiFormat::Claude.request_messages(&request);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].content, "checking");
        assert_eq!(msgs[1].role, Role::ToolUse);
        let calls = msgs[1].tool_calls.as_ref().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id.as_deref(), Some("toolu_1"));
        assert_eq!(calls[1].name, "grep");
    }

    #[test]
    fn tool_result_blocks_flatten_list_content() {
        let request = json!({
            "messages": [{
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": "toolu_1",
                    "is_error": true,
                    "content": [
                        {"type": "text", "text": "line one"},
                        {"type": "text", "text": "line two"},
                    ],
                }],
            }],
        });
        let msgs = ApiFormat::Claude.request_messages(&request);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::ToolResult);
        assert_eq!(msgs[0].content, "line one\nline two");
        assert_eq!(msgs[0].tool_use_id.as_deref(), Some("toolu_1"));
        assert_eq!(msgs[0].is_error, Some(true));
    }

    #[test]
    fn empty_thinking_blocks_are_skipped_in_requests() {
        let request = json!({
            "messages": [{
                "role": "assistant",
                "content": [
                    {"type": "thinking", "thinking": ""},
                    {"type": "thinking", "thinking": "hm"},
                ],
            }],
        });
        let msgs = ApiFormat::Claude.request_messages(&request);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::Thinking);
        assert_eq!(msgs[0].content, "hm");
    }

    #[test]
    fn unknown_block_types_are_kept_as_serialized_json() {
        let request = json!({
            "messages": [{
                "role": "user",
                "content": [{"type": "document", "source": "s3://x"}],
            }],
        });
        let msgs = ApiFormat::Claude.request_messages(&request);
        assert_eq!(msgs[0].role, Role::User);
        assert!(msgs[0].content.contains("\"document\""));
    }

    // -- Claude response side -----------------------------------------------

    #[test]
    fn tool_use_and_text_blocks_yield_exactly_one_assistant_message() {
        let response = json!({
            "content": [
                {"type": "text", "text": "Let me "},
                {"type": "tool_use", "id": "toolu_1", "name": "read", "input": {"p": "/x"}},
                {"type": "text", "text": "check."},
            ],
        });
        let msgs = ApiFormat::Claude.response_messages(Some(&response), None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::ToolUse);
        assert_eq!(msgs[0].content, "Let me check.");
        assert_eq!(msgs[0].tool_calls.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn response_thinking_blocks_become_their_own_messages() {
        let response = json!({
            "content": [
                {"type": "thinking", "thinking": "plan"},
                {"type": "text", "text": "done"},
            ],
        });
        let msgs = ApiFormat::Claude.response_messages(Some(&response), None);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::Thinking);
        assert_eq!(msgs[0].content, "plan");
        assert_eq!(msgs[1].role, Role::Assistant);
        assert_eq!(msgs[1].content, "done");
    }

    #[test]
    fn empty_claude_response_still_yields_one_assistant_message() {
        let msgs = ApiFormat::Claude.response_messages(Some(&json!({"content": []})), None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::Assistant);
        assert_eq!(msgs[0].content, "");
    }

    #[test]
    fn streamed_claude_response_is_decoded_first() {
        let response = json!({
            "stream": true,
            "sse_lines": [
                r#"data: {"type":"content_block_start","index":0,"content_block":{"type":"text","text":""}}"#,
                r#"data: {"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"ok"}}"#,
            ],
        });
        let msgs = ApiFormat::Claude.response_messages(Some(&response), None);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content, "ok");
    }

    // -- Tool definitions ---------------------------------------------------

    #[test]
    fn openai_function_tools_map_to_tool_defs() {
        let request = json!({
            "tools": [
                {"type": "function", "function": {
                    "name": "read_file",
                    "description": "Read a file",
                    "parameters": {"type": "object"},
                }},
                {"type": "retrieval"},
            ],
        });
        let tools = ApiFormat::OpenAi.tools(&request);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "read_file");
        assert_eq!(tools[0].parameters, json!({"type": "object"}));
    }

    #[test]
    fn claude_tools_read_input_schema() {
        let request = json!({
            "tools": [{"name": "grep", "description": "", "input_schema": {"type": "object"}}],
        });
        let tools = ApiFormat::Claude.tools(&request);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "grep");
        assert_eq!(tools[0].parameters, json!({"type": "object"}));
    }
}
