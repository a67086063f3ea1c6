use super::*;

#[test]
fn check_options_default_matches_spec_defaults() {
    let opts = CheckOptions::default();
    assert!(!opts.wait);
    assert!(opts.mark_read);
    assert_eq!(opts.mode, CheckMode::Unread);
    assert_eq!(opts.limit, 1);
}

#[test]
fn payload_text_round_trips_through_json() {
    let payload = Payload::Text("No mentions".to_string());
    let json = serde_json::to_string(&payload).unwrap();
    let back: Payload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}

#[test]
fn payload_events_round_trips_through_json() {
    let payload = Payload::Events {
        events: vec![RawEvent { id: Some("AAAA1111".into()), sender_name: "alice".into(), content: "hi @bot".into() }],
    };
    let json = serde_json::to_string(&payload).unwrap();
    let back: Payload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}
