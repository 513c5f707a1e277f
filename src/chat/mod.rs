// ABOUTME: Chat session with streamed replies and a single retried non-streaming fallback
// ABOUTME: Publishes transcript state through a watch channel for UI observers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chat session
//!
//! [`ChatSession::send`] appends the user's message immediately, then streams the
//! assistant reply. If the stream fails, the same message is sent once more through the
//! non-streaming endpoint under a retry policy. If that is exhausted too, a fixed
//! fallback reply is appended and a dismissible error is raised. `send` itself never
//! fails.

mod session;

pub use session::{ChatOptions, ChatSession, ChatSnapshot, SendOutcome};
