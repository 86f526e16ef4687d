//! Integration coverage for store transitions, invariants, and persistence.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use cronos_core::{
    CycleAction, CycleStatus, CycleStore, CycleUpdate, CyclesState, FileSlot, HistoryOrder,
    PersistenceAdapter,
};
use tempfile::tempdir;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap()
}

fn assert_invariants(state: &CyclesState) {
    state
        .check_invariants()
        .unwrap_or_else(|violation| panic!("invariant broken: {violation}"));
    let active: Vec<_> = state.cycles.iter().filter(|c| c.is_active()).collect();
    assert!(active.len() <= 1);
    assert_eq!(
        active.first().map(|c| &c.id),
        state.active_cycle_id.as_ref()
    );
    for cycle in &state.cycles {
        assert!(!(cycle.interrupted_date.is_some() && cycle.finished_date.is_some()));
    }
}

#[test]
fn test_mixed_action_sequence_keeps_invariants() {
    let store = CycleStore::in_memory();
    let mut now = t0();
    let actions = vec![
        CycleAction::start("Plan", 25),
        CycleAction::Finish,
        CycleAction::Finish,
        CycleAction::start("Write", 10),
        CycleAction::start("Rejected while active", 10),
        CycleAction::Interrupt,
        CycleAction::Interrupt,
        CycleAction::Unknown,
        CycleAction::start("Review", 5),
    ];

    for action in actions {
        now += Duration::seconds(30);
        let _ = store.dispatch_at(action, now);
        assert_invariants(&store.snapshot());
    }

    let statuses: Vec<_> = store
        .history(HistoryOrder::AsInserted)
        .iter()
        .map(|c| c.status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            CycleStatus::Finished,
            CycleStatus::Interrupted,
            CycleStatus::Active
        ]
    );
}

#[test]
fn test_finish_twice_changes_state_once() {
    let store = CycleStore::in_memory();
    store
        .dispatch_at(CycleAction::start("Plan", 5), t0())
        .unwrap();

    let first = store
        .dispatch_at(CycleAction::Finish, t0() + Duration::seconds(300))
        .unwrap();
    let after_first = store.snapshot();
    let second = store
        .dispatch_at(CycleAction::Finish, t0() + Duration::seconds(301))
        .unwrap();

    assert!(matches!(first, CycleUpdate::Apply(_)));
    assert_eq!(second, CycleUpdate::Skip);
    assert_eq!(store.snapshot(), after_first);
}

#[test]
fn test_interrupt_right_after_start() {
    let store = CycleStore::in_memory();
    store
        .dispatch_at(CycleAction::start("Plan", 5), t0())
        .unwrap();
    store.dispatch_at(CycleAction::Interrupt, t0()).unwrap();

    let state = store.snapshot();
    assert_eq!(state.active_cycle_id, None);
    assert_eq!(state.cycles[0].interrupted_date, Some(t0()));
    assert_eq!(state.cycles[0].finished_date, None);
}

#[test]
fn test_file_backed_round_trip_across_reopen() {
    let temp = tempdir().unwrap();
    let open = || {
        CycleStore::open(PersistenceAdapter::new(Arc::new(FileSlot::new(
            temp.path().join("state"),
        ))))
    };

    let store = open();
    store
        .dispatch_at(CycleAction::start("Plan", 25), t0())
        .unwrap();
    store
        .dispatch_at(CycleAction::Finish, t0() + Duration::seconds(1500))
        .unwrap();
    store
        .dispatch_at(CycleAction::start("Write", 10), t0() + Duration::seconds(1600))
        .unwrap();
    let saved = store.snapshot();
    drop(store);

    let reopened = open();
    assert_eq!(reopened.snapshot(), saved);
    let active = reopened.active_cycle().unwrap();
    assert_eq!(active.task, "Write");
    assert_eq!(active.start_date, t0() + Duration::seconds(1600));
}

#[test]
fn test_corrupt_file_opens_empty_store() {
    let temp = tempdir().unwrap();
    let slot = FileSlot::new(temp.path());
    std::fs::write(slot.path_for(cronos_core::persistence::STATE_KEY), "{not json").unwrap();

    let store = CycleStore::open(PersistenceAdapter::new(Arc::new(slot)));
    assert_eq!(store.snapshot(), CyclesState::default());

    // The store stays usable and overwrites the bad slot on the next transition.
    store
        .dispatch_at(CycleAction::start("Plan", 5), t0())
        .unwrap();
    assert!(store.active_cycle().is_some());
}
