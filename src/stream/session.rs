// ABOUTME: Streaming chat session state machine driving StreamHandler callbacks
// ABOUTME: Also exposes a pull-based frame stream and an abort handle for in-flight streams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::decoder::{StreamFrame, StreamLineBuffer};
use super::ByteStream;
use futures_util::stream::unfold;
use futures_util::{Stream, StreamExt};
use pierre_coach_core::{ApiError, ApiResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Lifecycle of a single streamed reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Created, nothing read yet
    Init,
    /// Reading frames
    Streaming,
    /// Sentinel received or stream ended cleanly
    Complete,
    /// Transport or read failure
    Error,
    /// Caller aborted the stream
    Cancelled,
}

impl StreamState {
    /// Whether no further transitions can happen
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error | Self::Cancelled)
    }
}

/// Receives decoded stream events in arrival order
///
/// At most one of `on_complete` / `on_error` is called per stream, and nothing is
/// called after it.
pub trait StreamHandler: Send {
    /// A text delta arrived
    fn on_chunk(&mut self, delta: &str);
    /// The stream finished normally
    fn on_complete(&mut self);
    /// The stream failed
    fn on_error(&mut self, error: &ApiError);
}

/// Cancels the stream a [`StreamSession`] is reading
#[derive(Debug, Clone)]
pub struct StreamAbortHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StreamAbortHandle {
    /// Create a handle and the signal it controls
    #[must_use]
    pub fn new() -> (Self, AbortSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, AbortSignal { rx })
    }

    /// Abort the stream; idempotent
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Re-arm the handle for the next stream and return a fresh signal
    #[must_use]
    pub fn rearm(&self) -> AbortSignal {
        self.tx.send_replace(false);
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Whether the handle is currently tripped
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Receiving side of a [`StreamAbortHandle`]
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// A signal that never fires
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether the stream has been aborted
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once aborted; pends forever if the handle is dropped untripped
    pub async fn aborted(&mut self) {
        if self.rx.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives one byte stream through the decoder into a [`StreamHandler`]
#[derive(Debug)]
pub struct StreamSession {
    state: StreamState,
    buffer: StreamLineBuffer,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    /// Fresh session in [`StreamState::Init`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: StreamState::Init,
            buffer: StreamLineBuffer::new(),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Read `bytes` to a terminal state, dispatching to `handler`
    ///
    /// The byte stream is dropped before returning, whatever the outcome. Calling `run`
    /// on a session that has already left [`StreamState::Init`] does nothing.
    pub async fn run<H>(
        &mut self,
        mut bytes: ByteStream,
        handler: &mut H,
        mut abort: AbortSignal,
    ) -> StreamState
    where
        H: StreamHandler + ?Sized,
    {
        if self.state != StreamState::Init {
            return self.state;
        }
        self.state = StreamState::Streaming;

        loop {
            let next = tokio::select! {
                biased;
                () = abort.aborted() => {
                    debug!("Chat stream aborted by caller");
                    self.state = StreamState::Cancelled;
                    return self.state;
                }
                next = bytes.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    let frames = self.buffer.feed(&chunk);
                    if self.dispatch(frames, handler) {
                        return self.state;
                    }
                }
                Some(Err(e)) => {
                    warn!(error_class = %e.class(), error = %e, "Chat stream read failed");
                    self.state = StreamState::Error;
                    handler.on_error(&e);
                    return self.state;
                }
                None => {
                    let frames = self.buffer.flush();
                    if !self.dispatch(frames, handler) {
                        debug!("Chat stream ended without sentinel");
                        self.state = StreamState::Complete;
                        handler.on_complete();
                    }
                    return self.state;
                }
            }
        }
    }

    /// Forward frames; returns true once the sentinel completes the stream
    fn dispatch<H>(&mut self, frames: Vec<StreamFrame>, handler: &mut H) -> bool
    where
        H: StreamHandler + ?Sized,
    {
        for frame in frames {
            match frame {
                StreamFrame::Delta(text) | StreamFrame::Raw(text) => handler.on_chunk(&text),
                StreamFrame::Done => {
                    self.state = StreamState::Complete;
                    handler.on_complete();
                    return true;
                }
            }
        }
        false
    }
}

struct DecodeState {
    bytes: ByteStream,
    buffer: StreamLineBuffer,
    pending: VecDeque<ApiResult<StreamFrame>>,
    finished: bool,
}

impl DecodeState {
    /// Queue frames up to and including the sentinel; returns true if it was seen
    fn enqueue(&mut self, frames: Vec<StreamFrame>) -> bool {
        for frame in frames {
            let done = frame == StreamFrame::Done;
            self.pending.push_back(Ok(frame));
            if done {
                return true;
            }
        }
        false
    }
}

/// Pull-based decoding of a chat byte stream
///
/// Yields text frames in arrival order and ends with exactly one terminal item: either
/// `Ok(StreamFrame::Done)` (sentinel or clean end of stream) or an `Err`. Nothing is
/// read from the underlying stream after the terminal item.
pub fn decode_stream(bytes: ByteStream) -> impl Stream<Item = ApiResult<StreamFrame>> + Send {
    let state = DecodeState {
        bytes,
        buffer: StreamLineBuffer::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let frames = state.buffer.feed(&chunk);
                    state.finished = state.enqueue(frames);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(e));
                }
                None => {
                    state.finished = true;
                    let frames = state.buffer.flush();
                    if !state.enqueue(frames) {
                        state.pending.push_back(Ok(StreamFrame::Done));
                    }
                }
            }
        }
    })
}
