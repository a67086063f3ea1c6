// SPDX-License-Identifier: MIT

//! Reference [`MessageHandler`]: echoes the mention back with a
//! timestamp (spec.md §4.4 "added"; grounded in the `echo_monitor.py`
//! handler used throughout the original test suite).

use crate::handler::{IncomingMessage, MessageHandler};
use async_trait::async_trait;
use chrono::Utc;

/// Reply prefix that both identifies an echo reply and, when seen in an
/// *incoming* mention, triggers loop suppression (S2).
pub const ECHO_MARKER: &str = "Echo received at";

/// Replies `"Echo received at HH:MM:SS from @sender: <body>"`, or an empty
/// string when the incoming content is itself an echo reply (prevents the
/// two agents from echoing each other forever).
#[derive(Debug, Default)]
pub struct EchoHandler;

#[async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(&self, incoming: IncomingMessage) -> String {
        if incoming.content.contains(ECHO_MARKER) {
            return String::new();
        }

        let body = extract_body(&incoming.content);
        let timestamp = Utc::now().format("%H:%M:%S");
        format!("{ECHO_MARKER} {timestamp} from @{}: {body}", incoming.sender)
    }
}

/// Pulls the text after the first `@mention` out of a raw payload, mirroring
/// `echo_monitor.py`'s `re.search(r"@\S+\s+(.+)", content)` and its trailing
/// `"..."` trim.
fn extract_body(content: &str) -> String {
    let mut words = content.split_whitespace();
    let body = loop {
        match words.next() {
            Some(word) if word.starts_with('@') => break words.collect::<Vec<_>>().join(" "),
            Some(_) => continue,
            None => break content.trim().to_string(),
        }
    };
    let body = body.trim();
    body.strip_suffix("...").unwrap_or(body).trim().to_string()
}

#[cfg(test)]
#[path = "echo_handler_tests.rs"]
mod tests;
