use super::*;

#[test]
fn orphans_among_excludes_pids_already_tracked() {
    let observed = vec![
        ObservedEngineProcess { pid: 10, agent_id: "a1".to_string() },
        ObservedEngineProcess { pid: 20, agent_id: "a2".to_string() },
    ];

    let orphans = orphans_among(observed, &[10]);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].pid, 20);
}

#[test]
fn orphans_among_returns_everything_when_nothing_is_tracked() {
    let observed = vec![ObservedEngineProcess { pid: 10, agent_id: "a1".to_string() }];
    assert_eq!(orphans_among(observed, &[]).len(), 1);
}

#[test]
fn scanning_the_real_proc_table_does_not_panic_and_finds_no_engines() {
    // Nothing in this test process tree runs the real `__run-engine`
    // subcommand, so the scan should simply come back empty.
    let found = scan_engine_processes();
    assert!(found.iter().all(|p| !p.agent_id.is_empty()));
}
