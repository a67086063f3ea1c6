use super::*;
use qmon_core::{AgentId, FakeClock};
use tempfile::tempdir;

fn agent(s: &str) -> AgentId {
    AgentId::parse(s).unwrap()
}

fn store(dir: &tempfile::TempDir, clock: FakeClock) -> MessageStore<FakeClock> {
    MessageStore::open(dir.path().join("wal.jsonl"), Some(dir.path().join("snap.json")), clock).unwrap()
}

#[test]
fn put_then_peek_pending_shows_the_message_in_fifo_order() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
    store.put("m2".into(), agent("bot"), agent("alice"), "again".into()).unwrap();

    let pending = store.peek_pending(&agent("bot"));
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id.as_str(), "m1");
    assert_eq!(pending[1].id.as_str(), "m2");
}

#[test]
fn duplicate_put_with_same_id_and_agent_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
    store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();

    assert_eq!(store.count_pending(&agent("bot")), 1);
}

#[test]
fn mark_processing_then_processed_removes_from_pending() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
    store.mark_processing("m1".into(), agent("bot")).unwrap();
    store.mark_processed("m1".into(), agent("bot")).unwrap();

    assert_eq!(store.count_pending(&agent("bot")), 0);
}

#[test]
fn pause_then_resume_round_trips_status() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    store.pause(agent("bot"), "#pause".into(), None).unwrap();
    assert!(store.get_status(&agent("bot")).is_paused());

    store.resume(agent("bot")).unwrap();
    assert!(!store.get_status(&agent("bot")).is_paused());
}

#[test]
fn done_prefixed_pause_clears_backlog_on_resume() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
    store.pause(agent("bot"), "Done: wrapped up".into(), None).unwrap();
    store.resume(agent("bot")).unwrap();

    assert_eq!(store.count_pending(&agent("bot")), 0);
}

#[test]
fn check_auto_resume_resumes_only_elapsed_timers() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    let store = store(&dir, clock.clone());

    let now = clock.epoch_ms();
    store.pause(agent("bot"), "#pause 1m".into(), Some(now + 60_000)).unwrap();
    assert!(store.check_auto_resume().unwrap().is_empty());

    clock.advance(std::time::Duration::from_millis(60_000));
    let resumed = store.check_auto_resume().unwrap();
    assert_eq!(resumed, vec![agent("bot")]);
    assert!(!store.get_status(&agent("bot")).is_paused());
}

#[test]
fn reopening_the_store_replays_the_wal_into_equivalent_state() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    {
        let store = store(&dir, clock.clone());
        store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
    }

    let reopened = store(&dir, clock);
    assert_eq!(reopened.count_pending(&agent("bot")), 1);
}

#[test]
fn snapshot_then_reopen_restores_state_without_replaying_the_wal_from_scratch() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    {
        let store = store(&dir, clock.clone());
        store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
        store.snapshot().unwrap();
    }

    let reopened = store(&dir, clock);
    assert_eq!(reopened.count_pending(&agent("bot")), 1);
}

#[test]
fn kill_switch_toggles_are_durable_across_reopen() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    {
        let store = store(&dir, clock.clone());
        store.activate_kill_switch().unwrap();
    }
    let reopened = store(&dir, clock);
    assert!(reopened.kill_switch_active());
}

#[test]
fn s3_a_fan_out_mention_enqueues_one_row_per_addressed_agent() {
    let dir = tempdir().unwrap();
    let store = store(&dir, FakeClock::new());

    for target in ["a1", "a2", "a3"] {
        store.put("AAAA1111".into(), agent(target), agent("sender"), "@a1 @a2 @a3 hi".into()).unwrap();
    }

    assert_eq!(store.count_pending(&agent("a1")), 1);
    assert_eq!(store.count_pending(&agent("a2")), 1);
    assert_eq!(store.count_pending(&agent("a3")), 1);

    store.mark_processing("AAAA1111".into(), agent("a1")).unwrap();
    store.mark_processed("AAAA1111".into(), agent("a1")).unwrap();

    assert_eq!(store.count_pending(&agent("a1")), 0);
    assert_eq!(store.count_pending(&agent("a2")), 1);
    assert_eq!(store.count_pending(&agent("a3")), 1);
}

#[test]
fn s4_a_row_left_mid_process_at_crash_time_is_still_pending_after_restart() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    {
        let store = store(&dir, clock.clone());
        store.put("m1".into(), agent("bot"), agent("alice"), "hi".into()).unwrap();
        // Crash simulated here: processing started but never marked processed.
        store.mark_processing("m1".into(), agent("bot")).unwrap();
    }

    let reopened = store(&dir, clock);
    let pending = reopened.peek_pending(&agent("bot"));
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id.as_str(), "m1");
}
