// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Content-addressed interning of messages and tools.
//
// Identity is a sha256 over the canonical JSON form (sorted keys,
// absent fields as null), truncated to 16 hex chars. Public ids are
// sequential counters so identical cooks produce identical files.

use super::normalize::NormalizedMessage;
use super::types::{CookedMessage, CookedTool};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Interning store for one cook run. Counters are owned here, never
/// global, so consecutive runs start from m0/t0 again.
#[derive(Debug, Default)]
pub struct DedupStore {
    messages: Vec<CookedMessage>,
    message_ids: HashMap<String, String>,
    tools: Vec<CookedTool>,
    tool_ids: HashMap<String, String>,
}

/// A tool definition as pulled off the wire, before interning.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

fn content_hash(canonical: &Value) -> String {
    // serde_json maps are BTreeMap-backed, so serialization is key-sorted.
    let serialized = canonical.to_string();
    let digest = Sha256::digest(serialized.as_bytes());
    format!("{digest:x}")[..16].to_string()
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern one normalized message, returning its stable id. The same
    /// (role, content, tool_calls, tool_use_id, is_error) tuple always
    /// maps to the same id within a run.
    pub fn intern_message(&mut self, msg: NormalizedMessage) -> String {
        let tool_calls_value = msg
            .tool_calls
            .as_ref()
            .map(|tc| serde_json::to_value(tc).unwrap_or(Value::Null))
            .unwrap_or(Value::Null);
        let canonical = json!({
            "content": msg.content,
            "is_error": msg.is_error,
            "role": msg.role.as_str(),
            "tool_calls": tool_calls_value,
            "tool_use_id": msg.tool_use_id,
        });
        let hash = content_hash(&canonical);
        if let Some(id) = self.message_ids.get(&hash) {
            return id.clone();
        }
        let id = format!("m{}", self.messages.len());
        self.message_ids.insert(hash, id.clone());
        self.messages.push(CookedMessage {
            id: id.clone(),
            role: msg.role,
            content: msg.content,
            tool_calls: msg.tool_calls,
            tool_use_id: msg.tool_use_id,
            is_error: msg.is_error,
        });
        id
    }

    /// Intern one tool definition, returning its stable id.
    pub fn intern_tool(&mut self, tool: ToolDef) -> String {
        let canonical = json!({
            "description": tool.description,
            "name": tool.name,
            "parameters": tool.parameters,
        });
        let hash = content_hash(&canonical);
        if let Some(id) = self.tool_ids.get(&hash) {
            return id.clone();
        }
        let id = format!("t{}", self.tools.len());
        self.tool_ids.insert(hash, id.clone());
        self.tools.push(CookedTool {
            id: id.clone(),
            name: tool.name,
            description: tool.description,
            parameters: tool.parameters,
        });
        id
    }

    /// Consume the store, yielding the interned tables in first-seen order.
    pub fn finish(self) -> (Vec<CookedMessage>, Vec<CookedTool>) {
        (self.messages, self.tools)
    }
}
