// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

pub mod cook;
pub mod detect;
pub mod proxy;
pub mod record;
pub mod sse;
pub mod storage;
pub mod upstream;
