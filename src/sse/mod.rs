// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// SSE decoding.
//
// Both providers stream responses as `data: <json>` lines. The decoders
// fold a captured line sequence back into the provider's non-streaming
// response shape, so the normalizer has a single code path per protocol.
// Malformed chunks are skipped; a damaged stream still decodes, minus
// the corrupted fragments.

pub mod claude;
pub mod openai;

pub use claude::decode_claude_sse;
pub use openai::decode_openai_sse;

/// Extract the payload of a `data:` line. Non-data lines (event markers,
/// comments, separators) yield `None`.
pub fn data_payload(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }
    trimmed
        .strip_prefix("data: ")
        .or_else(|| trimmed.strip_prefix("data:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_lines_yield_payload() {
        assert_eq!(data_payload("data: {\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(data_payload("data:{\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(data_payload("  data: [DONE]  "), Some("[DONE]"));
    }

    #[test]
    fn non_data_lines_are_ignored() {
        assert_eq!(data_payload(""), None);
        assert_eq!(data_payload("event: message_start"), None);
        assert_eq!(data_payload(": keep-alive comment"), None);
        assert_eq!(data_payload("retry: 500"), None);
    }
}
