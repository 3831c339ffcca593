// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

// Conversation lineage reconstruction.
//
// Requests carry no thread id, so parentage is inferred. Two phases per
// request, scanning earlier same-model requests most-recent first:
//   1. prefix: the candidate's full transcript (request + response ids)
//      is a literal prefix of this request's message ids
//   2. similarity: edit distance over id sequences, with a penalty for
//      differing tool sets, against a length-scaled threshold
// Anything below the threshold becomes a new root. The result is a
// forest; parents always precede children, so cycles cannot form.

use super::types::CookedRequest;
use std::collections::HashSet;

/// Classic edit distance over id sequences, unit cost, two-row DP.
pub fn levenshtein(a: &[String], b: &[String]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, a_item) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_item) in b.iter().enumerate() {
            let cost = if a_item == b_item { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// The candidate's full transcript: its request messages followed by its
/// response messages.
fn expected_sequence(candidate: &CookedRequest) -> Vec<String> {
    let mut seq = candidate.request_messages.clone();
    seq.extend(candidate.response_messages.iter().cloned());
    seq
}

fn is_prefix(expected: &[String], sequence: &[String]) -> bool {
    expected.len() <= sequence.len() && expected == &sequence[..expected.len()]
}

fn tool_penalty(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&String> = a.iter().collect();
    let set_b: HashSet<&String> = b.iter().collect();
    let diff = set_a.symmetric_difference(&set_b).count();
    0.5 * diff as f64
}

/// Populate `parent_id` across requests already sorted ascending by
/// timestamp. Candidates are restricted to earlier same-model requests.
pub fn assign_parents(requests: &mut [CookedRequest]) {
    for i in 0..requests.len() {
        let parent = find_parent(&requests[i], &requests[..i]);
        requests[i].parent_id = parent;
    }
}

fn find_parent(request: &CookedRequest, earlier: &[CookedRequest]) -> Option<String> {
    let candidates: Vec<&CookedRequest> = earlier
        .iter()
        .rev()
        .filter(|c| c.model == request.model)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    // Exact-continuation fast path.
    for candidate in &candidates {
        if is_prefix(&expected_sequence(candidate), &request.request_messages) {
            return Some(candidate.id.clone());
        }
    }

    // Strictly-greater replacement while scanning most-recent first, so
    // the most recent of equally scored candidates wins.
    let mut best: Option<(&CookedRequest, f64)> = None;
    for candidate in &candidates {
        let distance = levenshtein(&expected_sequence(candidate), &request.request_messages);
        let score = -(distance as f64) - tool_penalty(&request.tools, &candidate.tools);
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((candidate, score));
        }
    }

    let (candidate, score) = best?;
    let threshold = -0.5 * request.request_messages.len() as f64;
    if score < threshold {
        return None;
    }
    Some(candidate.id.clone())
}
