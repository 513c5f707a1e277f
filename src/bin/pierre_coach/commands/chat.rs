// ABOUTME: chat command - sends one message and prints the transcript
// ABOUTME: Streams deltas to stderr while the reply is in flight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{print_json, Services};
use anyhow::{bail, Result};
use pierre_coach_client::chat::SendOutcome;
use std::io::Write;
use tracing::info;

pub async fn send(
    services: &Services,
    message: &str,
    use_streaming: bool,
    conversation: Option<i64>,
) -> Result<()> {
    let chat = &services.chat;
    if let Some(id) = conversation {
        chat.select_conversation(id).await?;
    }

    // Echo deltas as they arrive
    let mut updates = chat.subscribe();
    let echo = tokio::spawn(async move {
        let mut printed = 0;
        while updates.changed().await.is_ok() {
            let text = updates.borrow_and_update().streaming_text.clone();
            match text {
                Some(text) if text.len() > printed => {
                    let mut stderr = std::io::stderr().lock();
                    let _ = write!(stderr, "{}", &text[printed..]);
                    let _ = stderr.flush();
                    printed = text.len();
                }
                Some(_) => {}
                None => printed = 0,
            }
        }
    });

    let outcome = chat.send(message, use_streaming).await;
    echo.abort();
    eprintln!();
    info!(?outcome, "Chat send finished");

    if outcome == SendOutcome::NotAuthenticated {
        bail!("PIERRE_API_TOKEN is not set");
    }
    print_json(&chat.snapshot())
}
