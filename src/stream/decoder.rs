// ABOUTME: Line-buffering decoder for the newline-delimited chat streaming protocol
// ABOUTME: Handles partial lines across chunk boundaries and multiple frames per chunk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_coach_core::constants::chat::{DELTA_FIELDS, DONE_SENTINEL, FRAME_PREFIX};
use serde_json::Value;
use std::mem;
use tracing::debug;

/// One decoded line of the chat stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Text delta extracted from a `data:` JSON payload
    Delta(String),
    /// Text passed through verbatim (unparseable payload or unprefixed line)
    Raw(String),
    /// The `data: [DONE]` sentinel
    Done,
}

impl StreamFrame {
    /// Text carried by this frame, if any
    #[must_use]
    pub fn delta(&self) -> Option<&str> {
        match self {
            Self::Delta(text) | Self::Raw(text) => Some(text),
            Self::Done => None,
        }
    }
}

/// Pull the text delta out of a decoded JSON payload
///
/// A bare JSON string is the delta itself. Objects are inspected field by field in
/// priority order; only string values count.
#[must_use]
pub fn extract_delta(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        Value::Object(map) => DELTA_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_str)),
        _ => None,
    }
}

/// Decode a single complete line
///
/// Returns `None` for blank lines, empty payloads, and JSON payloads without a delta.
#[must_use]
pub fn parse_line(line: &str) -> Option<StreamFrame> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(payload) = trimmed.strip_prefix(FRAME_PREFIX) else {
        return Some(StreamFrame::Raw(trimmed.to_owned()));
    };

    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == DONE_SENTINEL {
        return Some(StreamFrame::Done);
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(value) => {
            let delta = extract_delta(&value);
            if delta.is_none() {
                debug!(payload, "Stream payload carried no text delta");
            }
            delta
                .filter(|text| !text.is_empty())
                .map(|text| StreamFrame::Delta(text.to_owned()))
        }
        Err(_) => Some(StreamFrame::Raw(payload.to_owned())),
    }
}

/// Accumulates raw bytes and yields frames for each complete line
///
/// Lines are split on `\n` at the byte level before UTF-8 decoding, so a multi-byte
/// character split across two network chunks is reassembled intact. Invalid UTF-8 is
/// decoded lossily.
#[derive(Debug, Default)]
pub struct StreamLineBuffer {
    buffer: Vec<u8>,
}

impl StreamLineBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk, returning frames for every line it completes
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let line = String::from_utf8_lossy(&self.buffer[start..end]);
            if let Some(frame) = parse_line(line.trim_end_matches('\r')) {
                frames.push(frame);
            }
            start = end + 1;
        }
        self.buffer.drain(..start);

        frames
    }

    /// Decode whatever is left once the byte stream has ended
    pub fn flush(&mut self) -> Vec<StreamFrame> {
        let remaining = mem::take(&mut self.buffer);
        parse_line(&String::from_utf8_lossy(&remaining))
            .into_iter()
            .collect()
    }

    /// Bytes buffered without a terminating newline
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }
}
