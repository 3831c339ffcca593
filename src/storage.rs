// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Append-only JSONL record sink.
//
// One self-describing JSON object per line, in append order. Appends are
// serialized behind a mutex and each record is written with a single
// write_all call, so a logical append is all-or-nothing.

use crate::record::TraceRecord;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open trace file: {0}")]
    Open(std::io::Error),

    #[error("failed to append record: {0}")]
    Append(std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable sink for captured records.
///
/// Implementations must be Send + Sync so they can be shared across
/// request handlers via `Arc`.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Durably append one record. Atomic per call: concurrent appends may
    /// interleave in any order, but never within a single record.
    async fn append(&self, record: &TraceRecord) -> Result<(), StorageError>;
}

/// File-backed JSONL sink.
pub struct JsonlSink {
    file: Mutex<File>,
}

impl JsonlSink {
    /// Open (or create) the trace file for appending, creating parent
    /// directories as needed.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(StorageError::Open)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(StorageError::Open)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl RecordSink for JsonlSink {
    async fn append(&self, record: &TraceRecord) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(StorageError::Append)?;
        file.flush().await.map_err(StorageError::Append)?;
        Ok(())
    }
}
