// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Offline cooking pipeline.
//
// Loads raw records in bulk, then runs detect -> normalize -> dedup ->
// lineage in one pass and writes a single pretty-printed snapshot.
// Input errors are fatal to the whole run; no partial output file is
// ever written.

pub mod dedup;
pub mod lineage;
pub mod normalize;
pub mod types;

use crate::detect::FormatChoice;
use crate::record::TraceRecord;
use chrono::DateTime;
use dedup::DedupStore;
use std::path::Path;
use thiserror::Error;
use types::{CookedOutput, CookedRequest};

#[derive(Debug, Error)]
pub enum CookError {
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("parsing {path} line {line}: {source}")]
    Parse {
        path: String,
        line: usize,
        source: serde_json::Error,
    },
    #[error("writing {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("serializing cooked output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookSummary {
    pub records: usize,
    pub messages: usize,
    pub tools: usize,
    pub requests: usize,
}

/// Load raw records from a file holding either one JSON array, one JSON
/// object, or newline-delimited JSON. Any parse failure aborts the load.
pub fn load_records(path: &Path) -> Result<Vec<TraceRecord>, CookError> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| CookError::Read {
        path: display.clone(),
        source,
    })?;

    // A whole-file JSON document wins; anything else is treated as JSONL.
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&content) {
        let records = match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<TraceRecord>, _>>(),
            other => serde_json::from_value(other).map(|r| vec![r]),
        }
        .map_err(|source| CookError::Parse {
            path: display,
            line: 0,
            source,
        })?;
        return Ok(records);
    }

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| CookError::Parse {
            path: display.clone(),
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn timestamp_ms(iso: &str) -> i64 {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

/// Run the full pipeline over already-loaded records.
pub fn cook_records(records: &[TraceRecord], format: FormatChoice) -> CookedOutput {
    let mut store = DedupStore::new();
    let mut requests: Vec<CookedRequest> = Vec::new();

    for record in records {
        let api = format.resolve(record);

        let request_messages: Vec<String> = api
            .request_messages(&record.request)
            .into_iter()
            .map(|m| store.intern_message(m))
            .collect();
        let response_messages: Vec<String> = api
            .response_messages(record.response.as_ref(), record.error.as_deref())
            .into_iter()
            .map(|m| store.intern_message(m))
            .collect();
        let tools: Vec<String> = api
            .tools(&record.request)
            .into_iter()
            .map(|t| store.intern_tool(t))
            .collect();

        requests.push(CookedRequest {
            id: record.id.clone(),
            parent_id: None,
            timestamp: timestamp_ms(&record.timestamp),
            model: record
                .request
                .get("model")
                .and_then(|m| m.as_str())
                .unwrap_or("")
                .to_string(),
            request_messages,
            response_messages,
            tools,
            duration_ms: record.duration_ms,
        });
    }

    // Stable sort keeps encounter order among equal timestamps, which the
    // lineage tie-breaks rely on.
    requests.sort_by_key(|r| r.timestamp);
    lineage::assign_parents(&mut requests);

    let (messages, tools) = store.finish();
    CookedOutput {
        messages,
        tools,
        requests,
    }
}

/// Full cook entry point: load, cook, and write the snapshot. The output
/// file is only created after the whole pipeline has succeeded.
pub fn cook_traces(
    input: &Path,
    output: &Path,
    format: FormatChoice,
) -> Result<CookSummary, CookError> {
    let records = load_records(input)?;
    let cooked = cook_records(&records, format);
    let rendered = serde_json::to_string_pretty(&cooked)?;

    let display = output.display().to_string();
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| CookError::Write {
                path: display.clone(),
                source,
            })?;
        }
    }
    std::fs::write(output, rendered).map_err(|source| CookError::Write {
        path: display,
        source,
    })?;

    Ok(CookSummary {
        records: records.len(),
        messages: cooked.messages.len(),
        tools: cooked.tools.len(),
        requests: cooked.requests.len(),
    })
}
