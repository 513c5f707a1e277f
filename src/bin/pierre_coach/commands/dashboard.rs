// ABOUTME: dashboard, insights, and patterns commands
// ABOUTME: Prints dashboard state, merged AI insights, and best-effort pattern signals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{print_json, Services};
use anyhow::{Context, Result};

pub async fn show(services: &Services, refresh: bool) -> Result<()> {
    let dashboard = services
        .dashboard
        .load_dashboard(refresh)
        .await
        .context("Failed to load dashboard")?;
    print_json(&dashboard)
}

pub async fn insights(services: &Services) -> Result<()> {
    // Insights merge into the loaded dashboard; a failed load still allows generation
    let _ = services.dashboard.load_dashboard(false).await;
    let merged = services
        .dashboard
        .generate_ai_insights()
        .await
        .context("Failed to generate AI insights")?;
    print_json(&merged)
}

pub async fn patterns(services: &Services) -> Result<()> {
    print_json(&services.dashboard.load_patterns().await)
}
