// ABOUTME: Integration tests for the chat stream decoder and session state machine
// ABOUTME: Validates chunk boundaries, sentinel handling, errors, cancellation, and pull-based decoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use bytes::Bytes;
use futures_util::{stream, StreamExt};
use pierre_coach_client::stream::{
    decode_stream, AbortSignal, ByteStream, StreamAbortHandle, StreamFrame, StreamHandler,
    StreamLineBuffer, StreamSession, StreamState,
};
use pierre_coach_client::{ApiError, ApiResult};
use std::time::Duration;

#[derive(Debug, Default)]
struct Recorder {
    chunks: Vec<String>,
    completions: usize,
    errors: Vec<ApiError>,
}

impl StreamHandler for Recorder {
    fn on_chunk(&mut self, delta: &str) {
        self.chunks.push(delta.to_owned());
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }

    fn on_error(&mut self, error: &ApiError) {
        self.errors.push(error.clone());
    }
}

fn byte_stream(items: Vec<ApiResult<&'static str>>) -> ByteStream {
    Box::pin(stream::iter(
        items
            .into_iter()
            .map(|item| item.map(|text| Bytes::from_static(text.as_bytes()))),
    ))
}

async fn run(items: Vec<ApiResult<&'static str>>) -> (StreamState, Recorder) {
    let mut recorder = Recorder::default();
    let mut session = StreamSession::new();
    let state = session
        .run(byte_stream(items), &mut recorder, AbortSignal::never())
        .await;
    assert_eq!(session.state(), state);
    (state, recorder)
}

#[tokio::test]
async fn test_chunk_frames_then_done() {
    let (state, recorder) = run(vec![Ok(
        "data: {\"chunk\":\"A \"}\ndata: {\"chunk\":\"B\"}\ndata: [DONE]\n",
    )])
    .await;

    assert_eq!(state, StreamState::Complete);
    assert_eq!(recorder.chunks, vec!["A ", "B"]);
    assert_eq!(recorder.completions, 1);
    assert!(recorder.errors.is_empty());
}

#[tokio::test]
async fn test_line_split_across_chunks() {
    let (state, recorder) = run(vec![
        Ok("data: {\"conte"),
        Ok("nt\":\"Hello\"}\r\ndata: {\"token\""),
        Ok(":\" world\"}\n"),
        Ok("data: [DONE]\n"),
    ])
    .await;

    assert_eq!(state, StreamState::Complete);
    assert_eq!(recorder.chunks.concat(), "Hello world");
}

#[tokio::test]
async fn test_malformed_json_emitted_verbatim() {
    let (_, recorder) = run(vec![Ok("data: {\"content\": \"unterminated\ndata: [DONE]\n")]).await;
    assert_eq!(recorder.chunks, vec!["{\"content\": \"unterminated"]);
    assert_eq!(recorder.completions, 1);
}

#[tokio::test]
async fn test_unprefixed_line_is_literal_delta() {
    let (_, recorder) = run(vec![Ok("  plain text reply  \ndata: [DONE]\n")]).await;
    assert_eq!(recorder.chunks, vec!["plain text reply"]);
}

#[tokio::test]
async fn test_string_payload_is_delta() {
    let (_, recorder) = run(vec![Ok("data: \"quoted\"\ndata: [DONE]\n")]).await;
    assert_eq!(recorder.chunks, vec!["quoted"]);
}

#[tokio::test]
async fn test_nothing_read_after_sentinel() {
    let (state, recorder) = run(vec![
        Ok("data: {\"text\":\"only\"}\ndata: [DONE]\ndata: {\"text\":\"ignored\"}\n"),
        Err(ApiError::transport("never reached")),
    ])
    .await;

    assert_eq!(state, StreamState::Complete);
    assert_eq!(recorder.chunks, vec!["only"]);
    assert!(recorder.errors.is_empty());
}

#[tokio::test]
async fn test_read_error_fires_once() {
    let (state, recorder) = run(vec![
        Ok("data: {\"content\":\"partial\"}\n"),
        Err(ApiError::transport("connection reset")),
        Ok("data: {\"content\":\"after\"}\n"),
    ])
    .await;

    assert_eq!(state, StreamState::Error);
    assert_eq!(recorder.chunks, vec!["partial"]);
    assert_eq!(recorder.errors, vec![ApiError::transport("connection reset")]);
    assert_eq!(recorder.completions, 0);
}

#[tokio::test]
async fn test_end_of_stream_flushes_tail_and_completes() {
    let (state, recorder) = run(vec![Ok("data: {\"content\":\"a\"}\ndata: {\"content\":\"b\"}")]).await;

    assert_eq!(state, StreamState::Complete);
    assert_eq!(recorder.chunks, vec!["a", "b"]);
    assert_eq!(recorder.completions, 1);
}

#[tokio::test]
async fn test_session_runs_only_once() {
    let mut recorder = Recorder::default();
    let mut session = StreamSession::new();
    session
        .run(byte_stream(vec![Ok("data: [DONE]\n")]), &mut recorder, AbortSignal::never())
        .await;
    let state = session
        .run(
            byte_stream(vec![Ok("data: {\"content\":\"again\"}\n")]),
            &mut recorder,
            AbortSignal::never(),
        )
        .await;

    assert_eq!(state, StreamState::Complete);
    assert!(recorder.chunks.is_empty());
    assert_eq!(recorder.completions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_abort_cancels_without_callbacks() {
    let (handle, signal) = StreamAbortHandle::new();
    let head = stream::iter(vec![Ok(Bytes::from_static(b"data: {\"content\":\"hi\"}\n"))]);
    let stalled = stream::pending::<ApiResult<Bytes>>();
    let bytes: ByteStream = Box::pin(head.chain(stalled));

    let aborter = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
    });

    let mut recorder = Recorder::default();
    let mut session = StreamSession::new();
    let state = session.run(bytes, &mut recorder, signal).await;
    aborter.await.unwrap();

    assert_eq!(state, StreamState::Cancelled);
    assert!(state.is_terminal());
    assert_eq!(recorder.chunks, vec!["hi"]);
    assert_eq!(recorder.completions, 0);
    assert!(recorder.errors.is_empty());
}

#[tokio::test]
async fn test_rearmed_handle_resets_signal() {
    let (handle, first) = StreamAbortHandle::new();
    handle.abort();
    assert!(first.is_aborted());

    let second = handle.rearm();
    assert!(!second.is_aborted());
    assert!(!handle.is_aborted());
}

#[tokio::test]
async fn test_decode_stream_yields_frames_then_done() {
    let frames: Vec<ApiResult<StreamFrame>> = decode_stream(byte_stream(vec![
        Ok("data: {\"content\":\"x\"}\nraw line\n"),
        Ok("data: [DONE]\ndata: {\"content\":\"late\"}\n"),
    ]))
    .collect()
    .await;

    assert_eq!(
        frames,
        vec![
            Ok(StreamFrame::Delta("x".to_owned())),
            Ok(StreamFrame::Raw("raw line".to_owned())),
            Ok(StreamFrame::Done),
        ]
    );
}

#[tokio::test]
async fn test_decode_stream_ends_with_error() {
    let frames: Vec<ApiResult<StreamFrame>> = decode_stream(byte_stream(vec![
        Ok("data: {\"content\":\"x\"}\n"),
        Err(ApiError::transport("reset")),
        Ok("data: [DONE]\n"),
    ]))
    .collect()
    .await;

    assert_eq!(
        frames,
        vec![
            Ok(StreamFrame::Delta("x".to_owned())),
            Err(ApiError::transport("reset")),
        ]
    );
}

#[tokio::test]
async fn test_decode_stream_synthesizes_done_at_eof() {
    let frames: Vec<ApiResult<StreamFrame>> =
        decode_stream(byte_stream(vec![Ok("data: {\"text\":\"tail\"}")]))
            .collect()
            .await;

    assert_eq!(
        frames,
        vec![Ok(StreamFrame::Delta("tail".to_owned())), Ok(StreamFrame::Done)]
    );
}

#[test]
fn test_line_buffer_multiple_frames_per_chunk() {
    let mut buffer = StreamLineBuffer::new();
    let frames = buffer.feed(b"data: {\"content\":\"a\"}\n\ndata: {\"content\":\"b\"}\ndata: {\"con");
    assert_eq!(
        frames,
        vec![
            StreamFrame::Delta("a".to_owned()),
            StreamFrame::Delta("b".to_owned()),
        ]
    );
    assert!(buffer.pending_len() > 0);
    assert_eq!(buffer.feed(b"tent\":\"c\"}\n"), vec![StreamFrame::Delta("c".to_owned())]);
    assert!(buffer.flush().is_empty());
}
