// ABOUTME: Pierre coach CLI - chat with the AI coach and inspect dashboard, insights, and context
// ABOUTME: Thin command layer over the pierre_coach_client pipelines, printing JSON to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Stream a reply from the coach
//! PIERRE_API_TOKEN=... pierre-coach chat "How should I taper for Sunday?"
//!
//! # Continue a conversation without streaming
//! pierre-coach chat "And the day before?" --conversation 42 --no-stream
//!
//! # Dashboard, bypassing the cache
//! pierre-coach dashboard --refresh
//!
//! # Generate AI insights merged into the dashboard
//! pierre-coach insights
//!
//! # Training patterns and fatigue score
//! pierre-coach patterns
//!
//! # Aggregated coaching context
//! pierre-coach context --conversation 42
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::Services;
use pierre_coach_client::config::ClientConfig;
use pierre_coach_client::logging::LoggingConfig;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "pierre-coach",
    about = "Pierre AI coach client",
    long_about = "Chat with the Pierre AI coach and inspect the dashboard, AI insights, training patterns, and the aggregated coaching context."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend URL override (defaults to PIERRE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Send a message to the coach
    Chat {
        /// Message text
        message: String,

        /// Use the non-streaming endpoint
        #[arg(long)]
        no_stream: bool,

        /// Continue an existing conversation
        #[arg(long)]
        conversation: Option<i64>,
    },

    /// Show the dashboard
    Dashboard {
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Generate AI insights and show the merged dashboard
    Insights,

    /// Show training patterns and fatigue score
    Patterns,

    /// Show the aggregated coaching context
    Context {
        /// Include recent messages from this conversation
        #[arg(long)]
        conversation: Option<i64>,

        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
        config.validate()?;
    }
    debug!(api_url = %config.api_url, authenticated = config.api_token.is_some(), "Configuration loaded");

    let services = Services::from_config(&config)?;

    match cli.command {
        Command::Chat {
            message,
            no_stream,
            conversation,
        } => commands::chat::send(&services, &message, !no_stream, conversation).await?,
        Command::Dashboard { refresh } => commands::dashboard::show(&services, refresh).await?,
        Command::Insights => commands::dashboard::insights(&services).await?,
        Command::Patterns => commands::dashboard::patterns(&services).await?,
        Command::Context {
            conversation,
            refresh,
        } => commands::context::show(&services, conversation, refresh).await?,
    }

    Ok(())
}
