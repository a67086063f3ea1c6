use super::*;
use crate::handler::IncomingMessage;
use qmon_core::{AgentId, MessageId};

fn message(content: &str) -> IncomingMessage {
    IncomingMessage {
        id: MessageId::new("AAAA1111"),
        sender: AgentId::parse("a2").unwrap(),
        content: content.to_string(),
        enqueued_at_ms: 1_000,
    }
}

#[tokio::test]
async fn reply_begins_with_the_echo_marker_and_sender() {
    let reply = EchoHandler.handle(message("@a1 hello")).await;
    assert!(reply.starts_with(ECHO_MARKER));
    assert!(reply.contains("from @a2"));
}

#[tokio::test]
async fn reply_carries_the_body_after_the_mention() {
    let reply = EchoHandler.handle(message("@a1 hello there")).await;
    assert!(reply.ends_with("hello there"), "{reply}");
}

#[tokio::test]
async fn trailing_ellipsis_is_trimmed_from_the_body() {
    let reply = EchoHandler.handle(message("@a1 hello there...")).await;
    assert!(reply.ends_with("hello there"), "{reply}");
}

#[tokio::test]
async fn an_incoming_echo_reply_is_ignored_to_prevent_a_loop() {
    let reply = EchoHandler.handle(message("@a1 Echo received at 12:00:00 from @a2: hi")).await;
    assert_eq!(reply, "");
}

#[tokio::test]
async fn content_without_a_mention_falls_back_to_the_whole_body() {
    let reply = EchoHandler.handle(message("just some text with no mention")).await;
    assert!(reply.starts_with(ECHO_MARKER));
}

#[tokio::test]
async fn empty_content_still_produces_a_timestamped_reply() {
    let reply = EchoHandler.handle(message("")).await;
    assert!(reply.starts_with(ECHO_MARKER));
}
