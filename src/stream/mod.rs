// ABOUTME: Token-streaming chat protocol: line decoder, session state machine, abort handle
// ABOUTME: Shared by the chat session and the CLI's streaming output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat stream decoding
//!
//! The backend streams replies as newline-delimited frames:
//!
//! ```text
//! data: {"content":"Easy "}
//! data: {"content":"run today"}
//! data: [DONE]
//! ```
//!
//! [`StreamLineBuffer`] handles lines split across network chunks and several lines
//! per chunk. [`StreamSession`] drives a byte stream through it into a
//! [`StreamHandler`]; [`decode_stream`] offers the same decoding as an async stream.

/// Line buffering and frame parsing
pub mod decoder;
/// Session state machine and callbacks
pub mod session;

pub use decoder::{extract_delta, parse_line, StreamFrame, StreamLineBuffer};
pub use session::{
    decode_stream, AbortSignal, StreamAbortHandle, StreamHandler, StreamSession, StreamState,
};

use bytes::Bytes;
use futures_util::Stream;
use pierre_coach_core::ApiResult;
use std::pin::Pin;

/// Raw response body of a streaming chat request
pub type ByteStream = Pin<Box<dyn Stream<Item = ApiResult<Bytes>> + Send>>;
