// ABOUTME: Core types and constants for the Pierre coaching client
// ABOUTME: Foundation crate with the error taxonomy, wire models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Core
//!
//! Foundation crate providing shared types for the Pierre coaching client. It has no
//! async or HTTP dependencies so that it changes rarely and compiles once.
//!
//! ## Modules
//!
//! - **errors**: `ApiError` taxonomy and `ErrorClass` used for retry decisions and logging
//! - **constants**: endpoint paths, cache TTL presets, chat sentinels, intensity factors
//! - **models**: wire/domain models for profile, activities, races, chat and dashboard

/// Error taxonomy for remote calls
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Wire and domain models
pub mod models;

pub use errors::{ApiError, ApiResult, ErrorClass};
