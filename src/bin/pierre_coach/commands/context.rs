// ABOUTME: context command - prints the aggregated coaching context
// ABOUTME: Optionally scoped to a conversation and forced past the cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{print_json, Services};
use anyhow::{Context, Result};

pub async fn show(services: &Services, conversation: Option<i64>, refresh: bool) -> Result<()> {
    let context = services
        .aggregator
        .aggregate(conversation, refresh)
        .await
        .context("Failed to aggregate coaching context")?;
    print_json(&context)
}
