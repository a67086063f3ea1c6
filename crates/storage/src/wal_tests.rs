use super::*;
use qmon_core::AgentId;
use tempfile::tempdir;

fn put(seq_tag: &str, agent: &str) -> Event {
    Event::MessagePut {
        id: format!("m-{seq_tag}").into(),
        agent: AgentId::parse(agent).unwrap(),
        sender: AgentId::parse("alice").unwrap(),
        content: "hi".to_string(),
        enqueued_at_ms: 1,
    }
}

#[test]
fn append_assigns_sequential_seq_starting_at_one() {
    let dir = tempdir().unwrap();
    let mut wal = Wal::open(dir.path().join("wal.jsonl"), 0).unwrap();
    assert_eq!(wal.append(&put("a", "bot")).unwrap(), 1);
    assert_eq!(wal.append(&put("b", "bot")).unwrap(), 2);
    assert_eq!(wal.append(&put("c", "bot")).unwrap(), 3);
    assert_eq!(wal.write_seq(), 3);
}

#[test]
fn next_unprocessed_walks_forward_independent_of_mark_processed() {
    let dir = tempdir().unwrap();
    let mut wal = Wal::open(dir.path().join("wal.jsonl"), 0).unwrap();
    wal.append(&put("a", "bot")).unwrap();
    wal.append(&put("b", "bot")).unwrap();

    let first = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(first.seq, 1);
    let second = wal.next_unprocessed().unwrap().unwrap();
    assert_eq!(second.seq, 2);
    assert!(wal.next_unprocessed().unwrap().is_none());

    // marking seq 1 processed doesn't rewind the read cursor
    wal.mark_processed(1);
    assert!(wal.next_unprocessed().unwrap().is_none());
    assert_eq!(wal.processed_seq(), 1);
}

#[test]
fn reopening_with_processed_seq_skips_already_processed_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    {
        let mut wal = Wal::open(&path, 0).unwrap();
        wal.append(&put("a", "bot")).unwrap();
        wal.append(&put("b", "bot")).unwrap();
        wal.append(&put("c", "bot")).unwrap();
        wal.flush().unwrap();
    }

    let mut reopened = Wal::open(&path, 2).unwrap();
    assert_eq!(reopened.write_seq(), 3);
    let next = reopened.next_unprocessed().unwrap().unwrap();
    assert_eq!(next.seq, 3);
    assert!(reopened.next_unprocessed().unwrap().is_none());
}

#[test]
fn entries_after_returns_only_later_records() {
    let dir = tempdir().unwrap();
    let mut wal = Wal::open(dir.path().join("wal.jsonl"), 0).unwrap();
    wal.append(&put("a", "bot")).unwrap();
    wal.append(&put("b", "bot")).unwrap();
    wal.append(&put("c", "bot")).unwrap();

    let later = wal.entries_after(1).unwrap();
    assert_eq!(later.len(), 2);
    assert_eq!(later[0].seq, 2);
    assert_eq!(later[1].seq, 3);
}

#[test]
fn truncate_before_drops_earlier_entries_but_keeps_seq_numbering() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let mut wal = Wal::open(&path, 0).unwrap();
    wal.append(&put("a", "bot")).unwrap();
    wal.append(&put("b", "bot")).unwrap();
    wal.append(&put("c", "bot")).unwrap();

    wal.truncate_before(2).unwrap();
    assert_eq!(wal.entries_after(0).unwrap().len(), 2);
    assert_eq!(wal.write_seq(), 3);
}

#[test]
fn two_wals_on_the_same_path_cannot_both_hold_the_lock() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wal.jsonl");
    let _first = Wal::open(&path, 0).unwrap();
    let second = Wal::open(&path, 0);
    assert!(matches!(second, Err(WalError::Locked(_))));
}
