// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Cooked output schema.
//
// One schema for both wire protocols. Messages and tools are interned
// by content hash; requests reference them by id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized message role. Wire roles from either protocol collapse
/// into this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    ToolUse,
    ToolResult,
    Thinking,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::ToolUse => "tool_use",
            Role::ToolResult => "tool_result",
            Role::Thinking => "thinking",
        }
    }
}

/// One tool invocation carried by a `tool_use` message. Arguments are
/// fully parsed JSON, or `{"raw": <text>}` when parsing failed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEntry {
    pub name: String,
    pub arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Deduplicated message. The id is a content hash, so two identical
/// messages anywhere in the capture share one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Deduplicated tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedTool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One captured exchange, with messages and tools replaced by their
/// interned ids. `parent_id` is always serialized; `null` marks a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedRequest {
    pub id: String,
    pub parent_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub model: String,
    pub request_messages: Vec<String>,
    pub response_messages: Vec<String>,
    pub tools: Vec<String>,
    pub duration_ms: u64,
}

/// The complete cooked artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedOutput {
    pub messages: Vec<CookedMessage>,
    pub tools: Vec<CookedTool>,
    pub requests: Vec<CookedRequest>,
}
