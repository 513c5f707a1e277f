// ABOUTME: Main library entry point for the Pierre coaching client
// ABOUTME: Resilient streaming chat, cached context aggregation, and AI insight pipelines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Client
//!
//! Client-side core for talking to the Pierre coaching backend:
//!
//! - **Chat**: token-streamed replies with a single retried non-streaming fallback
//! - **Context**: concurrent fan-out to profile, activity, race, stats and history
//!   endpoints, tolerant of partial failure, with derived training metrics
//! - **Dashboard**: cached dashboard loads with latest-request-wins ordering and AI
//!   insight generation merged into the dashboard
//!
//! Network calls go through [`retry`] and responses through a bounded TTL [`cache`].
//! Remote endpoints sit behind the [`client::CoachApi`] trait.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_coach_client::chat::{ChatOptions, ChatSession};
//! use pierre_coach_client::client::{HttpCoachApi, HttpTimeouts, StaticSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Arc::new(StaticSession::authenticated("token"));
//! let api = Arc::new(HttpCoachApi::new(
//!     "http://localhost:8081",
//!     session.clone(),
//!     HttpTimeouts::default(),
//! )?);
//! let chat = ChatSession::new(api, session, ChatOptions::default());
//! chat.send("How should I pace my long run?", true).await;
//! println!("{:?}", chat.snapshot().messages);
//! # Ok(())
//! # }
//! ```

/// Bounded TTL response cache
pub mod cache;

/// Chat session with streaming and fallback
pub mod chat;

/// Remote API and session seams
pub mod client;

/// Environment-based configuration
pub mod config;

/// Aggregated coaching context and training metrics
pub mod context;

/// Dashboard and AI insight pipeline
pub mod dashboard;

/// Logging configuration and subscriber setup
pub mod logging;

/// Retry policy with exponential backoff and jitter
pub mod retry;

/// Chat stream decoding
pub mod stream;

pub use pierre_coach_core::{constants, models, ApiError, ApiResult, ErrorClass};
